/// Oracle poll cycle task
pub mod poller;
