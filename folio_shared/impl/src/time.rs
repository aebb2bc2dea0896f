use chrono::{DateTime, Utc};
use folio_di::Build;
use folio_shared_contracts::time::TimeService;
use folio_utils::trace_instrument;

#[derive(Debug, Clone, Copy, Build)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[trace_instrument]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
