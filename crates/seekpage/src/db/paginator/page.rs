//! Module: db::paginator::page
//! Responsibility: one page of rows plus its navigation tokens.
//! Does not own: token encoding or boundary detection.

///
/// Page
///
/// Rows in caller-visible order with serialized tokens for the neighbouring
/// pages. Tokens are captured from the first and last visible rows; an empty
/// page echoes the request token in both positions.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<R> {
    rows: Vec<R>,
    next_token: String,
    previous_token: String,
    has_next: bool,
    has_previous: bool,
}

impl<R> Page<R> {
    #[must_use]
    pub const fn new(
        rows: Vec<R>,
        next_token: String,
        previous_token: String,
        has_next: bool,
        has_previous: bool,
    ) -> Self {
        Self {
            rows,
            next_token,
            previous_token,
            has_next,
            has_previous,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Token that resumes after the last row of this page.
    #[must_use]
    pub fn next_token(&self) -> &str {
        &self.next_token
    }

    /// Token that resumes before the first row of this page.
    #[must_use]
    pub fn previous_token(&self) -> &str {
        &self.previous_token
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Consume this page and return
    /// `(rows, next_token, previous_token, has_next, has_previous)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<R>, String, String, bool, bool) {
        (
            self.rows,
            self.next_token,
            self.previous_token,
            self.has_next,
            self.has_previous,
        )
    }
}

impl<R> From<Page<R>> for (Vec<R>, String, String, bool, bool) {
    fn from(value: Page<R>) -> Self {
        value.into_parts()
    }
}
