//! In-memory [`Transport`] double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{QueryRequest, RawResponse, Transport, TransportError, TransportFuture};

type Scripted = Result<RawResponse, TransportError>;

/// Replays a fixed script of responses and records every request it sees.
///
/// Once the script runs out, the last entry repeats.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    seen: Mutex<Vec<QueryRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn repeating(response: Scripted) -> Self {
        Self::new(vec![response])
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<QueryRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn next_response(&self) -> Scripted {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = Some(next);
        }
        last.clone()
            .unwrap_or_else(|| Err(TransportError("empty script".into())))
    }
}

impl Transport for ScriptedTransport {
    fn post<'a>(&'a self, request: &'a QueryRequest) -> TransportFuture<'a> {
        self.seen.lock().unwrap().push(request.clone());
        let response = self.next_response();
        Box::pin(async move { response })
    }
}
