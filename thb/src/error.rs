use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThbError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("missing reference point {0}")]
    MissingPoint(String),

    #[error("no observations in {0} direction")]
    EmptyDirection(&'static str),

    #[error("shot {id} appears more than once in {direction} direction")]
    DuplicateShot { direction: &'static str, id: String },

    #[error("start and end point {0} share the same coordinates")]
    CoincidentPoints(String),
}
