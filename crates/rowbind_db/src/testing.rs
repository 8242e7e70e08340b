//! In-process connector that records every call, for unit tests.

use crate::connection::{Connection, Connector, ExecOutcome};
use crate::error::{DatabaseError, Result};
use crate::sql::Placeholder;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Open,
    Execute(String, Vec<Value>),
    Commit,
    Close,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    responses: VecDeque<std::result::Result<ExecOutcome, DatabaseError>>,
    refuse_open: bool,
    fail_close: bool,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingConnector {
    state: Rc<RefCell<State>>,
}

impl RecordingConnector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next `execute`. Unqueued calls report one affected row.
    pub(crate) fn respond(&self, outcome: ExecOutcome) {
        self.state.borrow_mut().responses.push_back(Ok(outcome));
    }

    pub(crate) fn fail_next(&self, err: DatabaseError) {
        self.state.borrow_mut().responses.push_back(Err(err));
    }

    pub(crate) fn refuse_open(&self) {
        self.state.borrow_mut().refuse_open = true;
    }

    /// Every later `close` records the event, then reports an error.
    pub(crate) fn fail_close(&self) {
        self.state.borrow_mut().fail_close = true;
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Statements executed so far.
    pub(crate) fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Execute(sql, params) => Some((sql.clone(), params.clone())),
                _ => None,
            })
            .collect()
    }
}

pub(crate) struct RecordingConnection {
    state: Rc<RefCell<State>>,
}

impl Connector for RecordingConnector {
    type Conn = RecordingConnection;

    fn open(&self) -> Result<RecordingConnection> {
        let mut state = self.state.borrow_mut();
        if state.refuse_open {
            return Err(DatabaseError::connection("connection refused").into());
        }
        state.events.push(Event::Open);
        Ok(RecordingConnection {
            state: Rc::clone(&self.state),
        })
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Format
    }
}

impl Connection for RecordingConnection {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        let mut state = self.state.borrow_mut();
        state
            .events
            .push(Event::Execute(sql.to_string(), params.to_vec()));
        match state.responses.pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(err)) => Err(err.into()),
            None => Ok(ExecOutcome {
                rows_affected: 1,
                rows: Vec::new(),
            }),
        }
    }

    fn commit(&mut self) -> Result<()> {
        self.state.borrow_mut().events.push(Event::Commit);
        Ok(())
    }

    fn close(self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Close);
        if state.fail_close {
            return Err(DatabaseError::connection("connection reset on close").into());
        }
        Ok(())
    }
}
