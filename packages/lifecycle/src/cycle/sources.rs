/// Temperature/humidity sensor. A failed read is reported as NaN.
pub trait SensorSource {
    async fn read_temperature(&mut self) -> f32;
    async fn read_humidity(&mut self) -> f32;
}

/// Splits one combined temperature/humidity conversion across the two
/// `SensorSource` reads: temperature triggers the conversion, humidity takes
/// the kept half.
#[derive(Debug, Default)]
pub struct PairedSample {
    humidity: Option<f32>,
}

impl PairedSample {
    /// Keeps the humidity of `reading` and returns its temperature (NaN on failure).
    pub fn store(&mut self, reading: Option<(f32, f32)>) -> f32 {
        match reading {
            Some((celsius, percent)) => {
                self.humidity = Some(percent);
                celsius
            }
            None => {
                self.humidity = None;
                f32::NAN
            }
        }
    }

    pub fn take_humidity(&mut self) -> Option<f32> {
        self.humidity.take()
    }
}

pub trait SupplyMonitor {
    async fn read_supply_voltage(&mut self) -> f32;
}

/// Stand-in for boards without a supply measurement; cannot be constructed.
pub enum NoSupplyMonitor {}

impl SupplyMonitor for NoSupplyMonitor {
    async fn read_supply_voltage(&mut self) -> f32 {
        match *self {}
    }
}

pub trait TelemetrySink {
    async fn upload_metric(&mut self, feed: &str, value: f32) -> bool;
    fn status_description(&self) -> &str;
}
