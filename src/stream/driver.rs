//! The state-machine driver behind every page stream
//!
//! One spawned task per stream runs [`drive`]: an iterative
//! fetch → emit → suspend loop, so arbitrarily long page sequences use
//! constant stack. The task owns the page source and the advance stream; the
//! shared state is held only weakly and the task exits as soon as the last
//! handle or subscription is gone (observed through the `closed` channel).

use crate::source::PageSource;
use crate::stream::shared::Shared;
use crate::stream::types::StreamState;
use futures::{FutureExt, Stream, StreamExt};
use std::sync::Weak;
use tokio::sync::watch;

pub(crate) async fn drive<S, A>(
    mut source: S,
    advance: A,
    shared: Weak<Shared<S::Page>>,
    mut closed: watch::Receiver<()>,
) where
    S: PageSource,
    A: Stream<Item = ()> + Send,
{
    // fused: the drain loop below may observe the end of the stream and the
    // suspension point will poll it again afterwards
    let advance = advance.fuse();
    tokio::pin!(advance);
    let mut previous: Option<S::Page> = None;

    loop {
        // Fetching
        {
            let Some(strong) = shared.upgrade() else { return };
            strong.set_state(StreamState::Fetching);
        }

        let fetched = {
            let fetch = source.next_page(previous.clone());
            tokio::pin!(fetch);
            tokio::select! {
                result = &mut fetch => Some(result),
                // every owner dropped; abandon the in-flight fetch
                _ = closed.changed() => None,
            }
        };
        let Some(result) = fetched else { return };

        let page = match result {
            Ok(page) => page,
            Err(error) => {
                if let Some(strong) = shared.upgrade() {
                    strong.fail(error);
                }
                return;
            }
        };

        // Signals that piled up while the fetch was in flight are no-ops.
        let mut dropped = 0u32;
        while let Some(Some(())) = advance.next().now_or_never() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::trace!(dropped, "ignored advance signals during fetch");
        }

        let more = source.has_next(&page);
        let Some(strong) = shared.upgrade() else { return };
        if !more {
            strong.complete_with(page);
            return;
        }
        previous = Some(page.clone());
        strong.emit(page);
        strong.set_state(StreamState::AwaitingAdvance);
        drop(strong);

        // AwaitingAdvance
        tokio::select! {
            signal = advance.next() => match signal {
                Some(()) => {}
                None => {
                    // advance source gone; no further page can be requested
                    if let Some(strong) = shared.upgrade() {
                        strong.complete();
                    }
                    return;
                }
            },
            _ = closed.changed() => return,
        }
    }
}
