/// Ticks returned per fetcher call.
pub const TICK_PAGE_SIZE: u64 = 512;

/// Highest offset the fetcher accepts before the index part of the
/// cursor has to advance.
const MAX_PAGE_OFFSET: u64 = 999;

/// Restartable cursor over the paged tick fetcher.
///
/// The fetcher addresses pages by an `(index, offset)` pair: the offset
/// climbs first and the index takes over once the offset is exhausted.
/// A page shorter than the page size means the tick table is drained and
/// pagination terminates.
#[derive(Debug, Clone)]
pub struct TickPager {
    index: u64,
    offset: u64,
    page_size: u64,
    done: bool,
}

impl TickPager {
    pub fn new() -> Self {
        Self::with_page_size(TICK_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            index: 0,
            offset: 0,
            page_size,
            done: false,
        }
    }

    /// Cursor for the next page, or `None` once pagination terminated.
    pub fn next_cursor(&self) -> Option<(u64, u64)> {
        (!self.done).then_some((self.index, self.offset))
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Records a fetched page of `len` ticks and advances the cursor.
    pub fn record(&mut self, len: usize) {
        if (len as u64) < self.page_size {
            self.done = true;
            return;
        }

        if self.offset < MAX_PAGE_OFFSET {
            self.offset += 1;
        } else {
            self.index += 1;
        }
    }

    /// Rewinds to the first page so the walk can start over.
    pub fn reset(&mut self) {
        self.index = 0;
        self.offset = 0;
        self.done = false;
    }
}

impl Default for TickPager {
    fn default() -> Self {
        Self::new()
    }
}
