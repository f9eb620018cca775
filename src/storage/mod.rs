pub mod results;

pub use results::{dump_record, write_check_json, write_claim_csv};
