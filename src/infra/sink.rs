use crate::app::ports::ResponseSink;
use std::sync::Mutex;

/// Prints each response on its own line
pub struct StdoutSink;

impl ResponseSink for StdoutSink {
    fn add(&self, text: &str) {
        println!("{}", text);
    }
}

/// Keeps responses in memory for callers that embed the engine
#[derive(Default)]
pub struct CollectingSink {
    responses: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn responses(&self) -> Vec<String> {
        self.responses.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ResponseSink for CollectingSink {
    fn add(&self, text: &str) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push(text.to_string());
        }
    }
}

impl<T: ResponseSink + ?Sized> ResponseSink for std::sync::Arc<T> {
    fn add(&self, text: &str) {
        (**self).add(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.add("first");
        sink.add("second");
        assert_eq!(sink.responses(), vec!["first", "second"]);
    }
}
