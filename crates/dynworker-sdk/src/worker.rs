//! Worker capability traits shared by host and module.

/// A unit of work produced by a module for a single event.
pub trait Worker {
    /// Process the raw event and return an HTTP-style status code.
    fn run(&mut self, event: &str) -> u32;

    /// Serialized JSON payload to return as the response body.
    ///
    /// Read by the host after [`Worker::run`] returns. The host drops bodies
    /// that are not valid JSON.
    fn body(&self) -> Option<String> {
        None
    }
}

/// Factory returned by the module entry point.
///
/// Consumed exactly once by the host.
pub trait WorkerBuilder {
    /// Build the worker for this invocation.
    fn build(self: Box<Self>) -> Box<dyn Worker>;
}
