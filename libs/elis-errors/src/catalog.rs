//! Static error definitions.

use crate::problem::Problem;
use http::StatusCode;

/// One entry of a module's error catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: StatusCode,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.status, self.title, detail)
            .with_code(self.code)
            .with_type(self.type_url)
    }
}
