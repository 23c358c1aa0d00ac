#[cfg(test)]
mod tests {
  use std::env;
  use std::time::Duration;

  use futures::future::join_all;
  use tokio::time::sleep;
  use tracing_subscriber::EnvFilter;

  use crate::collections::queue::async_bounded_queue::AsyncBoundedQueue;
  use crate::collections::{
    BlockingQueueBase, BlockingQueueReader, BlockingQueueWriter, QueueBase, QueueError, QueueReader, QueueWriter,
  };

  #[tokio::test]
  async fn test_new_queue() {
    let queue = AsyncBoundedQueue::<i32>::new(10).unwrap();
    assert_eq!(queue.capacity().await, 10);
    assert_eq!(queue.len().await, 0);
    assert_eq!(queue.remaining_capacity().await, 10);
    assert!(queue.is_empty().await);
    assert!(!queue.is_interrupted().await);
  }

  #[tokio::test]
  async fn test_zero_capacity_is_invalid() {
    match AsyncBoundedQueue::<i32>::new(0) {
      Err(QueueError::InvalidArgument(_)) => (),
      other => panic!("Expected InvalidArgument, got {:?}", other.map(|_| ())),
    }
  }

  #[tokio::test]
  async fn test_offer_and_poll() {
    let mut queue = AsyncBoundedQueue::new(3).unwrap();
    for i in 0..3 {
      assert!(queue.offer(i).await.is_ok());
    }
    assert!(queue.is_full().await);

    match queue.offer(3).await {
      Err(QueueError::OfferError(3)) => (),
      other => panic!("Expected OfferError, got {:?}", other),
    }

    for i in 0..3 {
      assert_eq!(queue.poll().await.unwrap(), Some(i));
    }
    assert!(queue.poll().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_put_waits_until_take() {
    env::set_var("RUST_LOG", "debug");
    let _ = tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .try_init();

    let mut queue = AsyncBoundedQueue::new(1).unwrap();
    queue.put("a".to_string()).await.unwrap();

    let mut producer_queue = queue.clone();
    let producer = tokio::spawn(async move { producer_queue.put("b".to_string()).await });

    sleep(Duration::from_millis(100)).await;
    assert!(!producer.is_finished());
    assert_eq!(queue.len().await, 1);

    assert_eq!(queue.take().await.unwrap(), Some("a".to_string()));
    producer.await.unwrap().unwrap();
    assert_eq!(queue.take().await.unwrap(), Some("b".to_string()));
  }

  #[tokio::test]
  async fn test_take_waits_until_put() {
    let mut queue = AsyncBoundedQueue::new(2).unwrap();

    let mut consumer_queue = queue.clone();
    let consumer = tokio::spawn(async move { consumer_queue.take().await });

    sleep(Duration::from_millis(100)).await;
    assert!(!consumer.is_finished());

    queue.put(42).await.unwrap();
    assert_eq!(consumer.await.unwrap().unwrap(), Some(42));
    assert_eq!(queue.len().await, 0);
  }

  #[tokio::test]
  async fn test_timeouts_hand_elements_back() {
    let mut queue = AsyncBoundedQueue::new(1).unwrap();
    queue.put(1).await.unwrap();

    let result = queue.put_timeout(2, Duration::from_millis(50)).await;
    assert_eq!(result, Err(QueueError::TimeoutError(Some(2))));
    assert_eq!(queue.len().await, 1);

    assert_eq!(queue.take_timeout(Duration::from_millis(50)).await, Ok(Some(1)));
    assert_eq!(
      queue.take_timeout(Duration::from_millis(50)).await,
      Err(QueueError::TimeoutError(None))
    );
  }

  #[tokio::test]
  async fn test_dropped_put_leaves_queue_untouched() {
    let mut queue = AsyncBoundedQueue::new(2).unwrap();
    queue.put(1).await.unwrap();
    queue.put(2).await.unwrap();

    let result = tokio::time::timeout(Duration::from_millis(50), queue.put(3)).await;
    assert!(result.is_err());

    assert_eq!(queue.len().await, 2);
    assert_eq!(queue.take().await.unwrap(), Some(1));
    assert_eq!(queue.take().await.unwrap(), Some(2));
  }

  #[tokio::test]
  async fn test_interrupt_cancels_waiters() {
    let mut queue = AsyncBoundedQueue::new(1).unwrap();
    queue.put(1).await.unwrap();

    let mut producer_queue = queue.clone();
    let producer = tokio::spawn(async move { producer_queue.put(2).await });
    sleep(Duration::from_millis(50)).await;

    queue.interrupt().await;
    assert_eq!(producer.await.unwrap(), Err(QueueError::CancelledError(Some(2))));
    assert!(queue.is_interrupted().await);
    assert_eq!(queue.len().await, 1);

    assert_eq!(queue.take().await.unwrap(), Some(1));
    assert_eq!(queue.take().await, Err(QueueError::CancelledError(None)));
    assert!(queue.offer(3).await.is_ok());
    assert_eq!(queue.poll().await.unwrap(), Some(3));
  }

  #[tokio::test]
  async fn test_clean_up_releases_blocked_producer() {
    let mut queue = AsyncBoundedQueue::new(2).unwrap();
    queue.offer_all(vec![1, 2]).await.unwrap();

    let producer_queue = queue.clone();
    let producer = tokio::spawn(async move { producer_queue.put_timeout(3, Duration::from_secs(5)).await });
    sleep(Duration::from_millis(50)).await;

    queue.clean_up().await;
    producer.await.unwrap().unwrap();
    assert_eq!(queue.len().await, 1);
    assert_eq!(queue.poll().await.unwrap(), Some(3));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_operations() {
    let queue = AsyncBoundedQueue::<usize>::new(4).unwrap();
    let mut producers = vec![];
    let mut consumers = vec![];

    for p in 0..5 {
      let mut q = queue.clone();
      producers.push(tokio::spawn(async move {
        for i in 0..40 {
          q.put(p * 40 + i).await.unwrap();
        }
      }));
    }

    for _ in 0..4 {
      let mut q = queue.clone();
      consumers.push(tokio::spawn(async move {
        let mut received = vec![];
        while received.len() < 50 {
          if let Some(element) = q.take().await.unwrap() {
            received.push(element);
          }
        }
        received
      }));
    }

    for producer in join_all(producers).await {
      producer.unwrap();
    }
    let mut received = join_all(consumers)
      .await
      .into_iter()
      .flat_map(|consumer| consumer.unwrap())
      .collect::<Vec<_>>();
    received.sort_unstable();

    assert_eq!(received, (0..200).collect::<Vec<_>>());
    assert_eq!(queue.len().await, 0);
  }
}
