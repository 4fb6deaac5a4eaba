//! Test worker module for end-to-end testing.
//!
//! Routes on the event's `rawPath`:
//!
//! | `rawPath`    | Status | Body                      |
//! |--------------|--------|---------------------------|
//! | `/forbidden` | 403    | none                      |
//! | `/teapot`    | 418    | none                      |
//! | `/explode`   | panics | none                      |
//! | anything else| 200    | `{"path": <rawPath>}`     |
//!
//! An event that is not JSON is answered with 400.

use dynworker_sdk::{Worker, WorkerBuilder, export_worker};
use serde_json::Value;

struct RouteWorker {
    body: Option<String>,
}

impl Worker for RouteWorker {
    fn run(&mut self, event: &str) -> u32 {
        let Ok(event) = serde_json::from_str::<Value>(event) else {
            return 400;
        };
        let path = event
            .get("rawPath")
            .and_then(Value::as_str)
            .unwrap_or("/");

        match path {
            "/forbidden" => 403,
            "/teapot" => 418,
            "/explode" => panic!("worker exploded on {path}"),
            _ => {
                self.body = Some(serde_json::json!({ "path": path }).to_string());
                200
            },
        }
    }

    fn body(&self) -> Option<String> {
        self.body.clone()
    }
}

struct RouteBuilder;

impl WorkerBuilder for RouteBuilder {
    fn build(self: Box<Self>) -> Box<dyn Worker> {
        Box::new(RouteWorker { body: None })
    }
}

export_worker!(RouteBuilder);
