//! Array-chunking page source
//!
//! Pages over an in-memory `Vec` in fixed-size chunks: the convenience
//! variant of the stream engine for callers whose "pages" are just slices of
//! a sequence they already hold.

use crate::error::Result;
use crate::source::PageSource;
use crate::stream::Pages;
use async_trait::async_trait;
use futures::Stream;

/// Pages over `items` in `size`-length chunks.
///
/// The cursor is explicit per-instance state; independent streams built from
/// the same items never share it. The final chunk may be shorter than `size`
/// when the item count does not divide evenly.
pub struct ChunkSource<T> {
    items: Vec<T>,
    size: usize,
    cursor: usize,
}

impl<T> ChunkSource<T> {
    /// Create a chunking source. `size` is clamped to at least 1.
    pub fn new(items: Vec<T>, size: usize) -> Self {
        Self {
            items,
            size: size.max(1),
            cursor: 0,
        }
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> PageSource for ChunkSource<T> {
    type Page = Vec<T>;

    async fn next_page(&mut self, _previous: Option<Vec<T>>) -> Result<Vec<T>> {
        let end = usize::min(self.cursor + self.size, self.items.len());
        let chunk = self.items[self.cursor..end].to_vec();
        self.cursor = end;
        Ok(chunk)
    }

    fn has_next(&mut self, _page: &Vec<T>) -> bool {
        self.cursor < self.items.len()
    }
}

/// Page over `items` in `size`-length chunks, driven by `advance`.
///
/// The first chunk is emitted eagerly; each advance event then yields one
/// more chunk until the items run out. An empty input yields a single empty
/// page and completes.
pub fn page_over<T, A>(items: Vec<T>, size: usize, advance: A) -> Pages<Vec<T>>
where
    T: Clone + Send + 'static,
    A: Stream<Item = ()> + Send + 'static,
{
    Pages::from_source(ChunkSource::new(items, size), advance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    async fn collect_chunks(len: usize, size: usize) -> Vec<Vec<usize>> {
        let mut source = ChunkSource::new((0..len).collect(), size);
        let mut pages = Vec::new();
        loop {
            let page = source.next_page(None).await.unwrap();
            let more = source.has_next(&page);
            pages.push(page);
            if !more {
                break;
            }
        }
        pages
    }

    #[test_case(11, 2, 6 ; "uneven tail")]
    #[test_case(6, 3, 2 ; "even split")]
    #[test_case(1, 5, 1 ; "single short page")]
    #[test_case(10, 1, 10 ; "page per item")]
    #[tokio::test]
    async fn test_chunk_page_counts(len: usize, size: usize, expected_pages: usize) {
        let pages = collect_chunks(len, size).await;
        assert_eq!(pages.len(), expected_pages);
        assert_eq!(pages.concat(), (0..len).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_final_page_is_short() {
        let pages = collect_chunks(11, 2).await;
        assert_eq!(pages.last().unwrap(), &vec![10]);
    }

    #[tokio::test]
    async fn test_empty_items_yield_one_empty_page() {
        let mut source = ChunkSource::new(Vec::<u8>::new(), 3);
        let page = source.next_page(None).await.unwrap();
        assert!(page.is_empty());
        assert!(!source.has_next(&page));
    }

    #[tokio::test]
    async fn test_zero_size_is_clamped() {
        let mut source = ChunkSource::new(vec![7, 8], 0);
        let page = source.next_page(None).await.unwrap();
        assert_eq!(page, vec![7]);
        assert!(source.has_next(&page));
    }

    #[tokio::test]
    async fn test_independent_sources_do_not_share_cursor() {
        let items = vec![0, 1, 2, 3];
        let mut a = ChunkSource::new(items.clone(), 2);
        let mut b = ChunkSource::new(items, 2);

        assert_eq!(a.next_page(None).await.unwrap(), vec![0, 1]);
        // advancing `a` must not move `b`'s cursor
        assert_eq!(b.next_page(None).await.unwrap(), vec![0, 1]);
        assert_eq!(a.next_page(None).await.unwrap(), vec![2, 3]);
    }
}
