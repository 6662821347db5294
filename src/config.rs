use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub clinic_open_hour: u32,
    pub clinic_close_hour: u32,
    pub slot_minutes: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let clinic_open_hour = env::var("CLINIC_OPEN_HOUR")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(9);
        let clinic_close_hour = env::var("CLINIC_CLOSE_HOUR")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(17);
        let slot_minutes = env::var("SLOT_MINUTES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(30);

        if clinic_close_hour <= clinic_open_hour {
            anyhow::bail!("CLINIC_CLOSE_HOUR must be after CLINIC_OPEN_HOUR");
        }

        Ok(Self {
            bind_addr,
            clinic_open_hour,
            clinic_close_hour,
            slot_minutes,
        })
    }
}
