//! Fixed-size pagination over ordered, restartable sequences.
//!
//! A [`Sequence`] can be counted and sliced any number of times, so the same
//! listing can be re-paginated deterministically. Page numbers are 1-based.
//! A page past the end is returned empty rather than clamped to the last page.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RepoError;

/// Posts per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// An ordered collection that can be counted and sliced repeatedly.
#[async_trait]
pub trait Sequence: Send + Sync {
    type Item: Send;

    /// Total number of items.
    async fn total(&self) -> Result<u64, RepoError>;

    /// Items `offset .. offset + limit` in sequence order.
    async fn slice(&self, offset: u64, limit: u64) -> Result<Vec<Self::Item>, RepoError>;
}

#[async_trait]
impl<T: Clone + Send + Sync> Sequence for Vec<T> {
    type Item = T;

    async fn total(&self) -> Result<u64, RepoError> {
        Ok(self.len() as u64)
    }

    async fn slice(&self, offset: u64, limit: u64) -> Result<Vec<T>, RepoError> {
        Ok(self
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// One page of a sequence plus the metadata needed to navigate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number as requested.
    pub number: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Number of pages; an empty sequence still has one (empty) page.
    ///
    /// A page size of zero counts as one item per page.
    pub fn num_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size.max(1)).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Same page metadata around different items.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            number: self.number,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

/// Parse a `?page=` value: missing, malformed or zero selects page 1.
pub fn page_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}

/// Slice page `page_number` (1-based) of `page_size` items out of `sequence`.
pub async fn paginate<S>(
    sequence: &S,
    page_number: u64,
    page_size: u64,
) -> Result<Page<S::Item>, RepoError>
where
    S: Sequence + ?Sized,
{
    let number = page_number.max(1);
    let page_size = page_size.max(1);
    let total_count = sequence.total().await?;
    let offset = (number - 1).saturating_mul(page_size);

    let items = if offset >= total_count {
        Vec::new()
    } else {
        sequence.slice(offset, page_size).await?
    };

    Ok(Page {
        items,
        number,
        page_size,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fourteen() -> Vec<u32> {
        (1..=14).collect()
    }

    #[tokio::test]
    async fn test_first_page_contains_ten_records() {
        let page = paginate(&fourteen(), 1, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert!(page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.num_pages(), 2);
        assert_eq!(page.next_page_number(), Some(2));
    }

    #[tokio::test]
    async fn test_second_page_contains_four_records() {
        let page = paginate(&fourteen(), 2, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(page.items, vec![11, 12, 13, 14]);
        assert!(!page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.previous_page_number(), Some(1));
    }

    #[tokio::test]
    async fn test_pages_cover_sequence_without_duplicates() {
        let items = fourteen();
        let first = paginate(&items, 1, 10).await.unwrap();
        let second = paginate(&items, 2, 10).await.unwrap();
        let union: Vec<u32> = first.items.into_iter().chain(second.items).collect();
        assert_eq!(union, items);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_empty() {
        let page = paginate(&fourteen(), 5, 10).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.number, 5);
        assert_eq!(page.total_count, 14);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[tokio::test]
    async fn test_empty_sequence_has_one_page() {
        let page = paginate(&Vec::<u32>::new(), 1, 10).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.num_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_zero_page_size_does_not_divide_by_zero() {
        let page = Page {
            items: vec![1u32, 2, 3],
            number: 1,
            page_size: 0,
            total_count: 3,
        };
        assert_eq!(page.num_pages(), 3);
        assert_eq!(page.next_page_number(), Some(2));
    }

    #[test]
    fn test_page_number_parsing() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some("2")), 2);
        assert_eq!(page_number(Some(" 3 ")), 3);
        assert_eq!(page_number(Some("0")), 1);
        assert_eq!(page_number(Some("-1")), 1);
        assert_eq!(page_number(Some("last")), 1);
    }
}
