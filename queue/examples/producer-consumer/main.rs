use std::env;
use std::thread;
use std::time::Duration;

use clap::Parser;
use nexus_bounded_queue_rs::collections::{BoundedQueue, QueueError};
use nexus_bounded_queue_rs::{ConfigOption, QueueConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "A fast producer and a slow consumer sharing a bounded queue")]
struct Args {
  #[arg(long, default_value_t = 5)]
  capacity: usize,
  #[arg(long, default_value_t = 10)]
  items: u32,
  #[arg(long, default_value = "100ms", value_parser = humantime::parse_duration)]
  produce_interval: Duration,
  #[arg(long, default_value = "300ms", value_parser = humantime::parse_duration)]
  consume_interval: Duration,
}

fn main() -> Result<(), QueueError<u32>> {
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();

  let args = Args::parse();
  let queue = BoundedQueue::<u32>::from_config(QueueConfig::from([
    ConfigOption::with_capacity(args.capacity),
    ConfigOption::with_name("demo".to_string()),
  ]))?;

  let producer = {
    let queue = queue.clone();
    let items = args.items;
    let interval = args.produce_interval;
    thread::spawn(move || -> Result<(), QueueError<u32>> {
      for i in 1..=items {
        queue.put(i)?;
        tracing::info!("Produced: {} (size: {})", i, queue.size());
        thread::sleep(interval);
      }
      Ok(())
    })
  };

  let consumer = {
    let queue = queue.clone();
    let items = args.items;
    let interval = args.consume_interval;
    thread::spawn(move || -> Result<(), QueueError<u32>> {
      for _ in 1..=items {
        thread::sleep(interval);
        let item = queue.get()?;
        tracing::info!("Consumed: {} (size: {})", item, queue.size());
      }
      Ok(())
    })
  };

  for handle in [producer, consumer] {
    match handle.join() {
      Ok(result) => result?,
      Err(_) => tracing::error!("worker thread panicked"),
    }
  }
  tracing::info!("Done!");
  Ok(())
}
