//! Mock UHF reader module for testing and development.
//!
//! The connector and its handle share one simulated module. Tests script the
//! module through the handle (tags in the field, injected statuses, memory
//! contents) and inspect what the controller sent to it.

use crate::{
    HardwareError, Result,
    traits::{UhfConnector, UhfDriver},
    types::{
        LockObjectCode, LockTypeCode, RawTag, ReaderStatus, RegionConf, TemperatureFamily,
        TemperatureTag,
    },
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::trace;
use uhf_core::{BankId, Password};

const USER_BANK_WORDS: usize = 32;

/// Driver command recorded by the mock, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Connect,
    HardwareVersion,
    SetPower { read: u8, write: u8 },
    GetPower,
    SetRegion(RegionConf),
    GetRegion,
    AsyncStartReading,
    AsyncStopReading,
    InventoryByTimer(u16),
    InventoryRealtime,
    ReadTagData { bank: BankId, start_addr: u32, words: u16 },
    WriteTagData { bank: BankId, start_addr: u32, data: Vec<u8>, words: u16 },
    WriteTagEpc(Vec<u8>),
    LockTag { object: LockObjectCode, lock_type: LockTypeCode },
    KillTag(Password),
    TemperatureTags(TemperatureFamily),
    SetInventoryFilter { data: Vec<u8>, bank: BankId, start_addr: u32, matching: bool },
    CancelInventoryFilter,
    FrequencyPoints,
    SetFrequencyPoints(Vec<u32>),
    Close,
}

impl MockCall {
    /// Whether the call is one of the two inventory poll primitives.
    #[must_use]
    pub fn is_poll(&self) -> bool {
        matches!(self, Self::InventoryByTimer(_) | Self::InventoryRealtime)
    }
}

#[derive(Debug)]
struct MockUhfState {
    connect_error: Option<HardwareError>,
    hardware_version: Option<String>,
    power: (u8, u8),
    power_report: Option<Vec<i32>>,
    region: RegionConf,
    async_reading: bool,
    field: Vec<RawTag>,
    batches: VecDeque<Result<Vec<RawTag>>>,
    poll_delay: Option<Duration>,
    memory: HashMap<BankId, Vec<u8>>,
    epc: Vec<u8>,
    killed: bool,
    temperatures: HashMap<TemperatureFamily, Result<Vec<TemperatureTag>>>,
    filter: Option<(Vec<u8>, BankId, u32, bool)>,
    frequencies: Vec<u32>,
    failures: HashMap<&'static str, HardwareError>,
    open: bool,
    calls: Vec<MockCall>,
}

impl MockUhfState {
    fn new(version: Option<String>) -> Self {
        let epc = vec![0xE2, 0x00, 0x00, 0x17, 0x22, 0x0A, 0x01, 0x23, 0x45, 0x60, 0x70, 0x80];
        let mut memory = HashMap::new();
        memory.insert(BankId::Reserved, vec![0; 8]);
        memory.insert(BankId::Epc, Self::epc_bank(&epc));
        memory.insert(BankId::Tid, vec![0xE2, 0x80, 0x11, 0x05, 0x20, 0x00, 0x4C, 0x3A]);
        memory.insert(BankId::User, vec![0; USER_BANK_WORDS * 2]);

        Self {
            connect_error: None,
            hardware_version: version,
            power: (26, 26),
            power_report: None,
            region: RegionConf::Na,
            async_reading: false,
            field: Vec::new(),
            batches: VecDeque::new(),
            poll_delay: None,
            memory,
            epc,
            killed: false,
            temperatures: HashMap::new(),
            filter: None,
            frequencies: vec![902_750, 903_250, 903_750],
            failures: HashMap::new(),
            open: false,
            calls: Vec::new(),
        }
    }

    /// EPC bank layout: CRC word, PC word, EPC.
    fn epc_bank(epc: &[u8]) -> Vec<u8> {
        let pc = ((epc.len() / 2) as u16) << 11;
        let mut bank = vec![0x00, 0x00];
        bank.extend_from_slice(&pc.to_be_bytes());
        bank.extend_from_slice(epc);
        bank
    }

    /// Record `call` and fail if the module is closed or a failure was
    /// injected for `command`.
    fn enter(&mut self, command: &'static str, call: MockCall) -> Result<()> {
        trace!("Mock UHF command: {:?}", call);
        self.calls.push(call);
        if !self.open {
            return Err(HardwareError::Status(ReaderStatus::InvalidReaderHandle));
        }
        if let Some(error) = self.failures.remove(command) {
            return Err(error);
        }
        Ok(())
    }

    fn require_tag(&self) -> Result<()> {
        if self.killed {
            return Err(HardwareError::Status(ReaderStatus::CmdNoTag));
        }
        Ok(())
    }

    fn field_tags(&mut self) -> Result<Vec<RawTag>> {
        match self.batches.pop_front() {
            Some(batch) => batch,
            None => Ok(self.field.clone()),
        }
    }
}

fn lock_state(state: &Mutex<MockUhfState>) -> MutexGuard<'_, MockUhfState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock connector for a simulated UHF reader module.
///
/// # Examples
///
/// ```
/// use uhf_hardware::mock::MockUhf;
/// use uhf_hardware::traits::{UhfConnector, UhfDriver};
/// use uhf_hardware::types::RawTag;
///
/// #[tokio::main]
/// async fn main() -> uhf_hardware::Result<()> {
///     let (connector, handle) = MockUhf::new();
///     handle.set_field(vec![RawTag::new(vec![0xE2, 0x00, 0x00, 0x01], -48)]);
///
///     let mut driver = connector.connect().await?;
///     let tags = driver.inventory_by_timer(50).await?;
///     assert_eq!(tags.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockUhf {
    state: Arc<Mutex<MockUhfState>>,
}

impl MockUhf {
    /// Create a mock module reporting a default hardware version.
    pub fn new() -> (Self, MockUhfHandle) {
        Self::with_version(Some("UHF-MOCK-1.0".to_string()))
    }

    /// Create a mock module reporting `version`, or no version at all.
    pub fn with_version(version: Option<String>) -> (Self, MockUhfHandle) {
        let state = Arc::new(Mutex::new(MockUhfState::new(version)));
        let handle = MockUhfHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl UhfConnector for MockUhf {
    type Driver = MockUhfDriver;

    async fn connect(&self) -> Result<MockUhfDriver> {
        let mut state = lock_state(&self.state);
        state.calls.push(MockCall::Connect);
        if let Some(error) = state.connect_error.clone() {
            return Err(error);
        }
        state.open = true;
        state.async_reading = false;
        Ok(MockUhfDriver {
            state: Arc::clone(&self.state),
        })
    }
}

/// Driver bound to the simulated module.
#[derive(Debug)]
pub struct MockUhfDriver {
    state: Arc<Mutex<MockUhfState>>,
}

impl MockUhfDriver {
    fn state(&self) -> MutexGuard<'_, MockUhfState> {
        lock_state(&self.state)
    }

    async fn poll_delay(&self) {
        let delay = self.state().poll_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl UhfDriver for MockUhfDriver {
    async fn hardware_version(&mut self) -> Result<Option<String>> {
        let mut state = self.state();
        state.enter("hardware_version", MockCall::HardwareVersion)?;
        Ok(state.hardware_version.clone())
    }

    async fn set_power(&mut self, read: u8, write: u8) -> Result<()> {
        let mut state = self.state();
        state.enter("set_power", MockCall::SetPower { read, write })?;
        state.power = (read, write);
        Ok(())
    }

    async fn get_power(&mut self) -> Result<Vec<i32>> {
        let mut state = self.state();
        state.enter("get_power", MockCall::GetPower)?;
        let (read, write) = state.power;
        Ok(state
            .power_report
            .clone()
            .unwrap_or_else(|| vec![i32::from(read), i32::from(write)]))
    }

    async fn set_region(&mut self, region: RegionConf) -> Result<()> {
        let mut state = self.state();
        state.enter("set_region", MockCall::SetRegion(region))?;
        state.region = region;
        Ok(())
    }

    async fn get_region(&mut self) -> Result<RegionConf> {
        let mut state = self.state();
        state.enter("get_region", MockCall::GetRegion)?;
        Ok(state.region)
    }

    async fn async_start_reading(&mut self) -> Result<()> {
        let mut state = self.state();
        state.enter("async_start_reading", MockCall::AsyncStartReading)?;
        state.async_reading = true;
        Ok(())
    }

    async fn async_stop_reading(&mut self) -> Result<()> {
        let mut state = self.state();
        state.enter("async_stop_reading", MockCall::AsyncStopReading)?;
        state.async_reading = false;
        Ok(())
    }

    async fn inventory_by_timer(&mut self, timeout_ms: u16) -> Result<Vec<RawTag>> {
        self.poll_delay().await;
        let mut state = self.state();
        state.enter("inventory", MockCall::InventoryByTimer(timeout_ms))?;
        state.field_tags()
    }

    async fn inventory_realtime(&mut self) -> Result<Vec<RawTag>> {
        self.poll_delay().await;
        let mut state = self.state();
        state.enter("inventory", MockCall::InventoryRealtime)?;
        if !state.async_reading {
            return Err(HardwareError::Status(ReaderStatus::CmdFailed));
        }
        state.field_tags()
    }

    async fn read_tag_data(
        &mut self,
        bank: BankId,
        start_addr: u32,
        words: u16,
        _password: Password,
        _timeout_ms: u16,
    ) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.enter(
            "read_tag_data",
            MockCall::ReadTagData {
                bank,
                start_addr,
                words,
            },
        )?;
        state.require_tag()?;

        let memory = state.memory.get(&bank).cloned().unwrap_or_default();
        let start = start_addr as usize * 2;
        let end = start + usize::from(words) * 2;
        memory
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or(HardwareError::Status(ReaderStatus::CmdFailed))
    }

    async fn write_tag_data(
        &mut self,
        bank: BankId,
        start_addr: u32,
        data: &[u8],
        words: u16,
        _password: Password,
        _timeout_ms: u16,
    ) -> Result<()> {
        let mut state = self.state();
        state.enter(
            "write_tag_data",
            MockCall::WriteTagData {
                bank,
                start_addr,
                data: data.to_vec(),
                words,
            },
        )?;
        state.require_tag()?;

        let start = start_addr as usize * 2;
        let end = start + usize::from(words) * 2;
        if data.len() != usize::from(words) * 2 {
            return Err(HardwareError::Status(ReaderStatus::InvalidPara));
        }
        let target = state
            .memory
            .get_mut(&bank)
            .and_then(|memory| memory.get_mut(start..end))
            .ok_or(HardwareError::Status(ReaderStatus::CmdFailed))?;
        target.copy_from_slice(data);
        Ok(())
    }

    async fn write_tag_epc(
        &mut self,
        epc: &[u8],
        _password: Password,
        _timeout_ms: u16,
    ) -> Result<()> {
        let mut state = self.state();
        state.enter("write_tag_epc", MockCall::WriteTagEpc(epc.to_vec()))?;
        state.require_tag()?;
        state.epc = epc.to_vec();
        state.memory.insert(BankId::Epc, MockUhfState::epc_bank(epc));
        Ok(())
    }

    async fn lock_tag(
        &mut self,
        object: LockObjectCode,
        lock_type: LockTypeCode,
        _password: Password,
        _timeout_ms: u16,
    ) -> Result<()> {
        let mut state = self.state();
        state.enter("lock_tag", MockCall::LockTag { object, lock_type })?;
        state.require_tag()
    }

    async fn kill_tag(&mut self, password: Password, _timeout_ms: u16) -> Result<()> {
        let mut state = self.state();
        state.enter("kill_tag", MockCall::KillTag(password))?;
        state.require_tag()?;
        state.killed = true;
        Ok(())
    }

    async fn temperature_tags(&mut self, family: TemperatureFamily) -> Result<Vec<TemperatureTag>> {
        let mut state = self.state();
        state.enter("temperature_tags", MockCall::TemperatureTags(family))?;
        state
            .temperatures
            .get(&family)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn set_inventory_filter(
        &mut self,
        data: &[u8],
        bank: BankId,
        start_addr: u32,
        matching: bool,
    ) -> Result<()> {
        let mut state = self.state();
        state.enter(
            "set_inventory_filter",
            MockCall::SetInventoryFilter {
                data: data.to_vec(),
                bank,
                start_addr,
                matching,
            },
        )?;
        state.filter = Some((data.to_vec(), bank, start_addr, matching));
        Ok(())
    }

    async fn cancel_inventory_filter(&mut self) -> Result<()> {
        let mut state = self.state();
        state.enter("cancel_inventory_filter", MockCall::CancelInventoryFilter)?;
        state.filter = None;
        Ok(())
    }

    async fn frequency_points(&mut self) -> Result<Vec<u32>> {
        let mut state = self.state();
        state.enter("frequency_points", MockCall::FrequencyPoints)?;
        Ok(state.frequencies.clone())
    }

    async fn set_frequency_points(&mut self, points: &[u32]) -> Result<()> {
        let mut state = self.state();
        state.enter("set_frequency_points", MockCall::SetFrequencyPoints(points.to_vec()))?;
        state.frequencies = points.to_vec();
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = self.state();
        state.enter("close", MockCall::Close)?;
        state.open = false;
        state.async_reading = false;
        Ok(())
    }
}

/// Handle for scripting and inspecting a mock UHF module.
///
/// Failures injected with [`fail_next`](Self::fail_next) are keyed by driver
/// method name (`"set_power"`, `"read_tag_data"`, ...); both inventory
/// primitives share the key `"inventory"`.
#[derive(Debug, Clone)]
pub struct MockUhfHandle {
    state: Arc<Mutex<MockUhfState>>,
}

impl MockUhfHandle {
    fn state(&self) -> MutexGuard<'_, MockUhfState> {
        lock_state(&self.state)
    }

    /// Make every subsequent `connect` fail with `error`.
    pub fn fail_connect(&self, error: HardwareError) {
        self.state().connect_error = Some(error);
    }

    /// Fail the next call of driver method `command` with `error`.
    pub fn fail_next(&self, command: &'static str, error: HardwareError) {
        self.state().failures.insert(command, error);
    }

    /// Tags returned by every poll once scripted batches are exhausted.
    pub fn set_field(&self, tags: Vec<RawTag>) {
        self.state().field = tags;
    }

    /// Queue the result of one future poll.
    pub fn push_batch(&self, batch: Result<Vec<RawTag>>) {
        self.state().batches.push_back(batch);
    }

    /// Delay every poll by `delay` before it touches the module.
    pub fn set_poll_delay(&self, delay: Duration) {
        self.state().poll_delay = Some(delay);
    }

    /// Override what `get_power` reports.
    pub fn set_power_report(&self, report: Vec<i32>) {
        self.state().power_report = Some(report);
    }

    pub fn set_region(&self, region: RegionConf) {
        self.state().region = region;
    }

    pub fn set_temperatures(
        &self,
        family: TemperatureFamily,
        result: Result<Vec<TemperatureTag>>,
    ) {
        self.state().temperatures.insert(family, result);
    }

    /// Overwrite `bank` memory.
    pub fn set_memory(&self, bank: BankId, data: Vec<u8>) {
        self.state().memory.insert(bank, data);
    }

    #[must_use]
    pub fn memory(&self, bank: BankId) -> Vec<u8> {
        self.state().memory.get(&bank).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn epc(&self) -> Vec<u8> {
        self.state().epc.clone()
    }

    #[must_use]
    pub fn power(&self) -> (u8, u8) {
        self.state().power
    }

    #[must_use]
    pub fn region(&self) -> RegionConf {
        self.state().region
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().open
    }

    #[must_use]
    pub fn is_async_reading(&self) -> bool {
        self.state().async_reading
    }

    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.state().killed
    }

    #[must_use]
    pub fn filter(&self) -> Option<(Vec<u8>, BankId, u32, bool)> {
        self.state().filter.clone()
    }

    #[must_use]
    pub fn frequencies(&self) -> Vec<u32> {
        self.state().frequencies.clone()
    }

    /// All recorded calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Recorded calls that are not inventory polls.
    #[must_use]
    pub fn commands(&self) -> Vec<MockCall> {
        self.state()
            .calls
            .iter()
            .filter(|call| !call.is_poll())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn poll_count(&self) -> usize {
        self.state().calls.iter().filter(|call| call.is_poll()).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}
