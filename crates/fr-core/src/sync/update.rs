//! The per-row snapshot delivered to views

use indexmap::IndexMap;

use crate::channels::ChannelRole;

/// Value of one channel at the cursor row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReading {
    pub role: ChannelRole,
    pub value: f64,
}

/// Everything a view needs to redraw for the current cursor position
#[derive(Debug, Clone, PartialEq)]
pub struct CursorUpdate {
    /// Row index into the loaded table
    pub index: usize,

    /// Value of the time column at `index`
    pub time: f64,

    /// Classified numeric channels at `index`, in table order
    pub channels: IndexMap<String, ChannelReading>,
}

impl CursorUpdate {
    /// Value of the column holding a role
    pub fn value(&self, role: ChannelRole) -> Option<f64> {
        self.channels
            .values()
            .find(|reading| reading.role == role)
            .map(|reading| reading.value)
    }

    /// Value of a column by name
    pub fn by_name(&self, name: &str) -> Option<f64> {
        self.channels.get(name).map(|reading| reading.value)
    }

    /// One-line numeric readout, e.g. `T: 12.34s | ALT: 100.0m`
    pub fn readout(&self) -> String {
        let mut parts = vec![format!("T: {:.2}s", self.time)];

        for reading in self.channels.values() {
            let unit = match reading.role {
                ChannelRole::Time | ChannelRole::Unclassified => continue,
                ChannelRole::Altitude => "m",
                ChannelRole::Velocity => "m/s",
                _ => "",
            };
            parts.push(format!("{}: {:.1}{}", reading.role.label(), reading.value, unit));
        }

        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update() -> CursorUpdate {
        let mut channels = IndexMap::new();
        channels.insert("time".to_string(), ChannelReading { role: ChannelRole::Time, value: 12.346 });
        channels.insert("alt".to_string(), ChannelReading { role: ChannelRole::Altitude, value: 100.04 });
        channels.insert("temp".to_string(), ChannelReading { role: ChannelRole::Unclassified, value: 21.0 });
        channels.insert("vel".to_string(), ChannelReading { role: ChannelRole::Velocity, value: -3.26 });
        CursorUpdate { index: 3, time: 12.346, channels }
    }

    #[test]
    fn test_lookups() {
        let update = update();
        assert_eq!(update.value(ChannelRole::Altitude), Some(100.04));
        assert_eq!(update.value(ChannelRole::Yaw), None);
        assert_eq!(update.by_name("temp"), Some(21.0));
    }

    #[test]
    fn test_readout() {
        assert_eq!(update().readout(), "T: 12.35s | ALT: 100.0m | VEL: -3.3m/s");
    }
}
