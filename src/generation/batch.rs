use futures::future::join_all;
use std::future::Future;
use std::time::Duration;

/// Run `f` over `items` in fixed-size batches
///
/// Futures inside a batch run concurrently; batches run one after another
/// with `delay` between them. Results keep the input order. A batch size of
/// zero is treated as one.
pub async fn run_in_batches<T, R, F, Fut>(
    items: Vec<T>,
    batch_size: usize,
    delay: Duration,
    mut f: F,
) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    let batch_size = batch_size.max(1);
    let total = items.len();
    let mut results = Vec::with_capacity(total);
    let mut items = items.into_iter().peekable();
    let mut batch_number = 0;

    while items.peek().is_some() {
        if batch_number > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        batch_number += 1;

        let futures: Vec<Fut> = items.by_ref().take(batch_size).map(&mut f).collect();
        ::log::debug!(
            "Running batch {} ({} of {} items)",
            batch_number,
            results.len() + futures.len(),
            total
        );
        results.extend(join_all(futures).await);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let results = run_in_batches(vec![3u64, 1, 2, 0], 2, Duration::ZERO, |n| async move {
            tokio::time::sleep(Duration::from_millis(n * 5)).await;
            n * 10
        })
        .await;
        assert_eq!(results, vec![30, 10, 20, 0]);
    }

    #[tokio::test]
    async fn test_batches_bound_concurrency() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        run_in_batches((0..7).collect(), 3, Duration::from_millis(1), |_| {
            let running = running.clone();
            let peak = peak.clone();
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_zero_batch_size_and_empty_input() {
        let results = run_in_batches(vec![1, 2], 0, Duration::ZERO, |n| async move { n }).await;
        assert_eq!(results, vec![1, 2]);

        let empty: Vec<i32> =
            run_in_batches(Vec::<i32>::new(), 4, Duration::ZERO, |n| async move { n }).await;
        assert!(empty.is_empty());
    }
}
