use thiserror::Error;

use crate::model::ParseIdError;
use crate::schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
