use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

/// Append-only transcript of what the bot heard, said and changed.
pub struct FileLogger {
    file: Mutex<std::fs::File>,
}

impl FileLogger {
    pub fn new(path: &str) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub fn log(&self, action: &str, details: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] [{}] {}\n", timestamp, action, details);

        print!("{}", line);

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }

    pub fn log_message(&self, channel_id: &str, author: &str, content: &str) {
        self.log("MESSAGE", &format!("#{} {}: {}", channel_id, author, content));
    }

    pub fn log_reply(&self, channel_id: &str, reply: &str) {
        self.log("REPLY", &format!("#{} {}", channel_id, reply));
    }

    pub fn log_mood(&self, channel_id: &str, from: &str, to: &str) {
        self.log("MOOD", &format!("#{} {} -> {}", channel_id, from, to));
    }

    pub fn log_power(&self, enabled: bool, user_id: u64) {
        let state = if enabled { "on" } else { "off" };
        self.log("POWER", &format!("{} by {}", state, user_id));
    }

    pub fn log_model(&self, model: &str, user_id: u64) {
        self.log("MODEL", &format!("{} by {}", model, user_id));
    }

    pub fn log_error(&self, error: &str) {
        self.log("ERROR", error);
    }
}
