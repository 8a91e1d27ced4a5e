//! End-to-end scenarios: builder form, pager handle and chunking
//!
//! Mirrors the classic paging flows: an eager first page, one page per
//! advance signal, completion once the source is exhausted, and a fetch
//! failure terminating the stream.

use futures::{Stream, StreamExt};
use once_cell::sync::Lazy;
use pagefeed::{page_over, page_stream, Error, Pager, StreamState};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

fn advance_channel() -> (
    mpsc::UnboundedSender<()>,
    impl Stream<Item = ()> + Send + 'static,
) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    (tx, futures::stream::poll_fn(move |cx| rx.poll_recv(cx)))
}

#[derive(Debug, Clone, PartialEq)]
struct CountPage {
    values: Vec<u32>,
    has_more: bool,
}

fn next_count_page(previous: Option<CountPage>) -> CountPage {
    let last = previous
        .and_then(|p| p.values.last().copied())
        .unwrap_or(0);
    let values = vec![last + 1, last + 2, last + 3];
    let has_more = last + 3 < 10;
    CountPage { values, has_more }
}

// ============================================================================
// Builder form
// ============================================================================

#[tokio::test]
async fn external_trigger_drives_the_builder_form() {
    Lazy::force(&TRACING);

    let (tx, advance) = advance_channel();
    let pages = page_stream(
        |previous: Option<CountPage>| async move { Ok(next_count_page(previous)) },
        |page: &CountPage| page.has_more,
        advance,
    );
    let mut sub = pages.subscribe();

    // page 1 arrives with no trigger event
    assert_eq!(sub.next().await.unwrap().unwrap().values, vec![1, 2, 3]);

    for expected in [vec![4, 5, 6], vec![7, 8, 9], vec![10, 11, 12]] {
        tx.send(()).unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap().values, expected);
    }
    assert!(sub.next().await.is_none());
    assert_eq!(pages.state(), StreamState::Completed);
}

// ============================================================================
// Pager handle
// ============================================================================

#[tokio::test]
async fn counting_pager_emits_four_pages_then_completes() {
    Lazy::force(&TRACING);

    let pager = Pager::new(
        |previous: Option<CountPage>| async move { Ok(next_count_page(previous)) },
        |page: &CountPage| page.has_more,
    );
    let mut sub = pager.pages();

    let mut seen = Vec::new();
    seen.push(sub.next().await.unwrap().unwrap().values);
    for _ in 0..3 {
        assert!(pager.advance());
        seen.push(sub.next().await.unwrap().unwrap().values);
    }

    assert_eq!(
        seen,
        vec![
            vec![1, 2, 3],
            vec![4, 5, 6],
            vec![7, 8, 9],
            vec![10, 11, 12],
        ]
    );
    assert!(sub.next().await.is_none());
    assert!(!pager.advance());
}

#[tokio::test]
async fn n_advances_yield_n_plus_one_pages() {
    let pager = Pager::new(
        |previous: Option<u32>| async move { Ok(previous.unwrap_or(0) + 1) },
        |page: &u32| *page < 100,
    );
    let mut sub = pager.pages();

    let mut seen = vec![sub.next().await.unwrap().unwrap()];
    for _ in 0..5 {
        assert!(pager.advance());
        seen.push(sub.next().await.unwrap().unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn fetch_failure_surfaces_once_then_stream_ends() {
    let pager = Pager::new(
        |previous: Option<u32>| async move {
            match previous {
                None => Ok(1),
                Some(_) => Err(Error::fetch("backend unavailable")),
            }
        },
        |_page: &u32| true,
    );
    let mut sub = pager.pages();

    assert_eq!(sub.next().await.unwrap().unwrap(), 1);
    assert!(pager.advance());
    assert_eq!(
        sub.next().await.unwrap().unwrap_err(),
        Error::fetch("backend unavailable")
    );
    assert!(sub.next().await.is_none());
    assert_eq!(pager.state(), StreamState::Failed);
}

#[tokio::test]
async fn late_subscriber_gets_replay_then_live_pages() {
    let pager = Pager::new(
        |previous: Option<CountPage>| async move { Ok(next_count_page(previous)) },
        |page: &CountPage| page.has_more,
    );
    let mut first = pager.pages();

    assert_eq!(first.next().await.unwrap().unwrap().values, vec![1, 2, 3]);
    assert!(pager.advance());
    assert_eq!(first.next().await.unwrap().unwrap().values, vec![4, 5, 6]);

    let mut late = pager.pages();
    assert_eq!(late.next().await.unwrap().unwrap().values, vec![4, 5, 6]);

    assert!(pager.advance());
    assert_eq!(late.next().await.unwrap().unwrap().values, vec![7, 8, 9]);
    assert_eq!(first.next().await.unwrap().unwrap().values, vec![7, 8, 9]);
}

// ============================================================================
// Chunking
// ============================================================================

#[tokio::test]
async fn chunking_eleven_items_by_two() {
    Lazy::force(&TRACING);

    let (tx, advance) = advance_channel();
    let pages = page_over((0..=10u32).collect(), 2, advance);
    let mut sub = pages.subscribe();

    assert_eq!(sub.next().await.unwrap().unwrap(), vec![0, 1]);
    for expected in [vec![2, 3], vec![4, 5], vec![6, 7], vec![8, 9], vec![10]] {
        tx.send(()).unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap(), expected);
    }
    assert!(sub.next().await.is_none());
    assert_eq!(pages.state(), StreamState::Completed);
}

#[tokio::test]
async fn chunking_streams_from_the_same_items_are_independent() {
    let items: Vec<u32> = (0..4).collect();

    let (_tx_a, advance_a) = advance_channel();
    let (tx_b, advance_b) = advance_channel();
    let a = page_over(items.clone(), 2, advance_a);
    let b = page_over(items, 2, advance_b);

    let mut sub_a = a.subscribe();
    let mut sub_b = b.subscribe();
    assert_eq!(sub_a.next().await.unwrap().unwrap(), vec![0, 1]);
    assert_eq!(sub_b.next().await.unwrap().unwrap(), vec![0, 1]);

    tx_b.send(()).unwrap();
    assert_eq!(sub_b.next().await.unwrap().unwrap(), vec![2, 3]);
}
