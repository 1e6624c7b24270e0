// Recording doubles for the storage contracts, shared by the migration tests.

use crate::core::economy::{
    AccountExport, BackendKind, BalanceStore, Cause, ConfiguredCurrencies, Currency,
    RawDataWriter, StoreError,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::io;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub player_id: Uuid,
    pub amount: Decimal,
    pub currency_id: String,
    pub cause: Cause,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRawWrite {
    pub player_id: String,
    pub amount: String,
    pub currency_id: String,
}

/// Balance store that remembers every write it receives.
pub struct RecordingStore {
    kind: BackendKind,
    raw_write: bool,
    pub writes: Mutex<Vec<RecordedWrite>>,
    pub raw_writes: Mutex<Vec<RecordedRawWrite>>,
}

impl RecordingStore {
    pub fn new(kind: BackendKind, raw_write: bool) -> Self {
        Self {
            kind,
            raw_write,
            writes: Mutex::new(Vec::new()),
            raw_writes: Mutex::new(Vec::new()),
        }
    }

    pub fn embedded() -> Self {
        Self::new(BackendKind::Embedded, false)
    }

    pub fn sql() -> Self {
        Self::new(BackendKind::Sql, true)
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn raw_writes(&self) -> Vec<RecordedRawWrite> {
        self.raw_writes.lock().unwrap().clone()
    }

    pub fn total_writes(&self) -> usize {
        self.writes.lock().unwrap().len() + self.raw_writes.lock().unwrap().len()
    }
}

#[async_trait]
impl BalanceStore for RecordingStore {
    fn backend(&self) -> BackendKind {
        self.kind
    }

    async fn get_balance(
        &self,
        player_id: Uuid,
        currency: &Currency,
    ) -> Result<Decimal, StoreError> {
        Ok(self
            .writes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|w| w.player_id == player_id && w.currency_id == currency.id)
            .map(|w| w.amount)
            .unwrap_or(Decimal::ZERO))
    }

    async fn set_balance(
        &self,
        player_id: Uuid,
        amount: Decimal,
        currency: &Currency,
        cause: &Cause,
    ) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(RecordedWrite {
            player_id,
            amount,
            currency_id: currency.id.clone(),
            cause: cause.clone(),
        });
        Ok(())
    }

    fn raw_writer(&self) -> Option<&dyn RawDataWriter> {
        if self.raw_write {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl RawDataWriter for RecordingStore {
    async fn set_raw_data(
        &self,
        player_id: &str,
        amount: &str,
        currency: &Currency,
    ) -> Result<(), StoreError> {
        Uuid::parse_str(player_id)
            .map_err(|e| StoreError::InvalidData(format!("player id '{player_id}': {e}")))?;
        Decimal::from_str(amount)
            .map_err(|e| StoreError::InvalidData(format!("amount '{amount}': {e}")))?;

        self.raw_writes.lock().unwrap().push(RecordedRawWrite {
            player_id: player_id.to_string(),
            amount: amount.to_string(),
            currency_id: currency.id.clone(),
        });
        Ok(())
    }
}

/// Export source serving a fixed set of lines.
pub struct StaticExport {
    pub lines: Vec<String>,
}

impl StaticExport {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl AccountExport for StaticExport {
    async fn export_account_lines(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lines.clone())
    }
}

pub fn currencies() -> ConfiguredCurrencies {
    ConfiguredCurrencies::new(
        vec![Currency::new("coins", "Coins"), Currency::new("gems", "Gems")],
        "coins",
    )
    .unwrap()
}

/// Collects formatted log output for the current thread while installed.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's events at DEBUG and above into the capture until the
    /// guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Lines logged at `level` (e.g. "ERROR").
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
