mod end_to_end;
mod idempotence;
mod util;
