pub mod telegram;

pub use telegram::TelegramService;
