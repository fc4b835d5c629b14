use std::{sync::Arc, time::Duration};

use invocation_logger::{CallValue, LoggingInterceptor};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TransferDTO {
    from: String,
    to: String,
    amount: u64,
}

#[derive(Debug)]
struct InsufficientFunds {
    available: u64,
}

impl std::fmt::Display for InsufficientFunds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "only {} available", self.available)
    }
}

impl std::error::Error for InsufficientFunds {}

struct Bank {
    reserves: u64,
}

impl Bank {
    async fn transfer(&self, transfer: &TransferDTO) -> Result<u64, InsufficientFunds> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if transfer.amount > self.reserves {
            return Err(InsufficientFunds {
                available: self.reserves,
            });
        }
        Ok(self.reserves - transfer.amount)
    }
}

fn try_init_logger() -> Result<(), Box<dyn std::error::Error>> {
    let level = log::LevelFilter::Debug;

    let logger = structured_logger::Builder::with_level(level.as_str())
        .with_target_writer("*", structured_logger::json::new_writer(std::io::stdout()))
        .build();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    try_init_logger()?;

    let interceptor = Arc::new(LoggingInterceptor::new().deep_rendering(true));
    let bank = interceptor.wrap(Bank { reserves: 100 });

    let small = TransferDTO {
        from: "alice".to_owned(),
        to: "bob".to_owned(),
        amount: 30,
    };
    let large = TransferDTO {
        from: "bob".to_owned(),
        to: "carol".to_owned(),
        amount: 300,
    };

    let first_future = bank.try_call_async(
        "transfer",
        &[CallValue::structured_serde(&small)],
        |bank| bank.transfer(&small),
    );
    let second_future = bank.try_call_async(
        "transfer",
        &[CallValue::structured_serde(&large)],
        |bank| bank.transfer(&large),
    );

    let (first, second) = futures_util::future::join(first_future, second_future).await;
    log::info!("First transfer left {first:?}");
    log::info!("Second transfer failed: {}", second.is_err());

    Ok(())
}
