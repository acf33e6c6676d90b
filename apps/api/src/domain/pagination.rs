use thiserror::Error;

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Rejected pagination input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("invalid page number: {0:?}")]
    InvalidNumber(String),

    #[error("invalid page size: {0:?}")]
    InvalidSize(String),

    #[error("page {number} of size {size} is out of range")]
    OutOfRange { number: u32, size: u32 },
}

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request, rejecting zero values and unaddressable offsets
    pub fn new(number: u32, size: u32) -> Result<Self, PaginationError> {
        if number == 0 {
            return Err(PaginationError::InvalidNumber(number.to_string()));
        }
        if size == 0 {
            return Err(PaginationError::InvalidSize(size.to_string()));
        }
        if checked_offset(number, size).is_none() {
            return Err(PaginationError::OutOfRange { number, size });
        }
        Ok(Self { number, size })
    }

    /// Parses raw query values, falling back to defaults when absent
    ///
    /// Present values must be strictly positive integers; an empty string
    /// is rejected rather than defaulted.
    ///
    /// # Example
    /// ```
    /// use courses_api::domain::pagination::PageRequest;
    ///
    /// let page = PageRequest::parse(None, Some("5")).unwrap();
    /// assert_eq!((page.number(), page.size()), (1, 5));
    ///
    /// assert!(PageRequest::parse(Some("invalid"), None).is_err());
    /// ```
    pub fn parse(number: Option<&str>, size: Option<&str>) -> Result<Self, PaginationError> {
        let number = match number {
            Some(raw) => parse_positive(raw)
                .ok_or_else(|| PaginationError::InvalidNumber(raw.to_string()))?,
            None => DEFAULT_PAGE_NUMBER,
        };
        let size = match size {
            Some(raw) => {
                parse_positive(raw).ok_or_else(|| PaginationError::InvalidSize(raw.to_string()))?
            }
            None => DEFAULT_PAGE_SIZE,
        };
        Self::new(number, size)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows to skip; bounded to `i64` by construction
    pub fn offset(&self) -> i64 {
        checked_offset(self.number, self.size).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// `(number - 1) * size`, or `None` past what an SQL `OFFSET` can hold
fn checked_offset(number: u32, size: u32) -> Option<i64> {
    (i64::from(number) - 1).checked_mul(i64::from(size))
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// One page of results plus what is needed to navigate around it
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total_entries: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_entries: u64) -> Self {
        Self {
            items,
            request,
            total_entries,
        }
    }

    pub fn number(&self) -> u64 {
        u64::from(self.request.number)
    }

    pub fn size(&self) -> u64 {
        u64::from(self.request.size)
    }

    /// Number of pages; zero when there are no entries
    pub fn total_pages(&self) -> u64 {
        self.total_entries.div_ceil(self.size())
    }

    pub fn first_page(&self) -> u64 {
        1
    }

    /// Last page, or the first page when there are no entries
    pub fn last_page(&self) -> u64 {
        self.total_pages().max(1)
    }

    /// Previous page; past-the-end requests point back at the last page
    pub fn prev_page(&self) -> Option<u64> {
        let number = self.number();
        if number == 1 {
            None
        } else if number > self.total_pages() {
            Some(self.last_page())
        } else {
            Some(number - 1)
        }
    }

    pub fn next_page(&self) -> Option<u64> {
        let number = self.number();
        if self.total_pages() == 0 || number >= self.total_pages() {
            None
        } else {
            Some(number + 1)
        }
    }
}
