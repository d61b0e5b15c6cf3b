use crate::db::SessionStore;
use crate::errors::{AppError, AppResult};
use crate::models::{FixSnapshot, LifecycleEvent, PositionRecord};
use crate::sink::Sink;
use crate::utils::time::now_local;

/// Sink backed by the SQLite session store.
///
/// The session is opened on construction and closed by SESSION_END; nothing
/// can be written to it afterwards.
pub struct StoreSink {
    store: Option<SessionStore>,
    session_id: i64,
    closed: bool,
}

impl StoreSink {
    pub fn begin(mut store: SessionStore) -> AppResult<Self> {
        let session_id = store.begin_session()?;
        Ok(Self {
            store: Some(store),
            session_id,
            closed: false,
        })
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    fn store_mut(&mut self) -> AppResult<&mut SessionStore> {
        if self.closed {
            return Err(AppError::SessionClosed(self.session_id));
        }
        self.store
            .as_mut()
            .ok_or_else(|| AppError::Other("store connection already released".into()))
    }
}

impl Sink for StoreSink {
    fn emit_event(&mut self, event: LifecycleEvent) -> AppResult<()> {
        let session_id = self.session_id;
        self.store_mut()?
            .record_event(session_id, event, now_local())?;

        if event.is_session_end() {
            self.closed = true;
        }
        Ok(())
    }

    fn emit_record(&mut self, fix: &FixSnapshot) -> AppResult<()> {
        let session_id = self.session_id;
        let record = PositionRecord::from_snapshot(fix);
        self.store_mut()?.record_sample(session_id, &record)
    }

    fn finish(&mut self) -> AppResult<()> {
        match self.store.take() {
            Some(store) => store.close(),
            None => Ok(()),
        }
    }
}
