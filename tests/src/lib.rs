#[cfg(test)]
mod reconcile;
