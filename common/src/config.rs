#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Returns from a reconciliation as soon as the upsert passes are dispatched.
    ///
    /// The passes keep running on the runtime; their outcomes can still be
    /// collected through the handle carried by the report.
    pub detach: bool,
    /// 0 = full output, 1 = summary only, 2 = silent
    pub quiet: u8,
}
