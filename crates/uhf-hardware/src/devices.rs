//! Enum wrappers for reader module dispatch.
//!
//! [`UhfDriver`] returns opaque futures and cannot be boxed as a trait
//! object. Binaries that pick a backend at runtime hold an
//! [`AnyUhfConnector`] instead, which yields an [`AnyUhfDriver`].
//!
//! # Examples
//!
//! ```
//! use uhf_hardware::devices::AnyUhfConnector;
//! use uhf_hardware::mock::MockUhf;
//!
//! let (connector, _handle) = MockUhf::new();
//! let any_connector = AnyUhfConnector::Mock(connector);
//! ```

use crate::mock::{MockUhf, MockUhfDriver};
use crate::traits::{UhfConnector, UhfDriver};
use crate::types::{
    LockObjectCode, LockTypeCode, RawTag, RegionConf, TemperatureFamily, TemperatureTag,
};
use crate::Result;
use uhf_core::{BankId, Password};

/// Enum wrapper for reader module connectors.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyUhfConnector {
    /// Simulated module for development and testing.
    Mock(MockUhf),
}

impl UhfConnector for AnyUhfConnector {
    type Driver = AnyUhfDriver;

    async fn connect(&self) -> Result<AnyUhfDriver> {
        match self {
            Self::Mock(connector) => connector.connect().await.map(AnyUhfDriver::Mock),
        }
    }
}

/// Enum wrapper for acquired reader module drivers.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyUhfDriver {
    Mock(MockUhfDriver),
}

impl UhfDriver for AnyUhfDriver {
    async fn hardware_version(&mut self) -> Result<Option<String>> {
        match self {
            Self::Mock(driver) => driver.hardware_version().await,
        }
    }

    async fn set_power(&mut self, read: u8, write: u8) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.set_power(read, write).await,
        }
    }

    async fn get_power(&mut self) -> Result<Vec<i32>> {
        match self {
            Self::Mock(driver) => driver.get_power().await,
        }
    }

    async fn set_region(&mut self, region: RegionConf) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.set_region(region).await,
        }
    }

    async fn get_region(&mut self) -> Result<RegionConf> {
        match self {
            Self::Mock(driver) => driver.get_region().await,
        }
    }

    async fn async_start_reading(&mut self) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.async_start_reading().await,
        }
    }

    async fn async_stop_reading(&mut self) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.async_stop_reading().await,
        }
    }

    async fn inventory_by_timer(&mut self, timeout_ms: u16) -> Result<Vec<RawTag>> {
        match self {
            Self::Mock(driver) => driver.inventory_by_timer(timeout_ms).await,
        }
    }

    async fn inventory_realtime(&mut self) -> Result<Vec<RawTag>> {
        match self {
            Self::Mock(driver) => driver.inventory_realtime().await,
        }
    }

    async fn read_tag_data(
        &mut self,
        bank: BankId,
        start_addr: u32,
        words: u16,
        password: Password,
        timeout_ms: u16,
    ) -> Result<Vec<u8>> {
        match self {
            Self::Mock(driver) => {
                driver
                    .read_tag_data(bank, start_addr, words, password, timeout_ms)
                    .await
            }
        }
    }

    async fn write_tag_data(
        &mut self,
        bank: BankId,
        start_addr: u32,
        data: &[u8],
        words: u16,
        password: Password,
        timeout_ms: u16,
    ) -> Result<()> {
        match self {
            Self::Mock(driver) => {
                driver
                    .write_tag_data(bank, start_addr, data, words, password, timeout_ms)
                    .await
            }
        }
    }

    async fn write_tag_epc(&mut self, epc: &[u8], password: Password, timeout_ms: u16) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.write_tag_epc(epc, password, timeout_ms).await,
        }
    }

    async fn lock_tag(
        &mut self,
        object: LockObjectCode,
        lock_type: LockTypeCode,
        password: Password,
        timeout_ms: u16,
    ) -> Result<()> {
        match self {
            Self::Mock(driver) => {
                driver
                    .lock_tag(object, lock_type, password, timeout_ms)
                    .await
            }
        }
    }

    async fn kill_tag(&mut self, password: Password, timeout_ms: u16) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.kill_tag(password, timeout_ms).await,
        }
    }

    async fn temperature_tags(&mut self, family: TemperatureFamily) -> Result<Vec<TemperatureTag>> {
        match self {
            Self::Mock(driver) => driver.temperature_tags(family).await,
        }
    }

    async fn set_inventory_filter(
        &mut self,
        data: &[u8],
        bank: BankId,
        start_addr: u32,
        matching: bool,
    ) -> Result<()> {
        match self {
            Self::Mock(driver) => {
                driver
                    .set_inventory_filter(data, bank, start_addr, matching)
                    .await
            }
        }
    }

    async fn cancel_inventory_filter(&mut self) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.cancel_inventory_filter().await,
        }
    }

    async fn frequency_points(&mut self) -> Result<Vec<u32>> {
        match self {
            Self::Mock(driver) => driver.frequency_points().await,
        }
    }

    async fn set_frequency_points(&mut self, points: &[u32]) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.set_frequency_points(points).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            Self::Mock(driver) => driver.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_connector_dispatch() {
        let (connector, handle) = MockUhf::new();
        let any = AnyUhfConnector::Mock(connector);

        let mut driver = any.connect().await.unwrap();
        driver.set_region(RegionConf::Eu).await.unwrap();
        assert_eq!(handle.region(), RegionConf::Eu);

        driver.close().await.unwrap();
        assert!(!handle.is_open());
    }
}
