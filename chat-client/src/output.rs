use colored::*;
use domain::Message;

/// The line a received message is printed as.
pub fn format_incoming(message: &Message) -> String {
    format!("[{}]: {}", message.sender_id, message.content)
}

pub fn print_incoming(message: &Message) {
    println!("{}", format_incoming(message));
}

pub fn print_status(text: &str) {
    println!("{} {}", "→".blue(), text);
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_line_shows_sender_and_content() {
        let message = Message::new("5e8848", "hello there", "2024-05-01T12:00:00+00:00");
        assert_eq!(format_incoming(&message), "[5e8848]: hello there");
    }

    #[test]
    fn test_incoming_line_keeps_empty_content() {
        let message = Message::new("abc", "", "t0");
        assert_eq!(format_incoming(&message), "[abc]: ");
    }
}
