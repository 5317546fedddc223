use serde::Serialize;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Envelope wrapped around every command result.
#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Listing<T: Serialize> {
    items: Vec<T>,
    count: usize,
}

impl<T: Serialize> Envelope<T> {
    fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "api_version": API_VERSION,
                "error": format!("failed to encode response: {}", e),
            })
            .to_string()
        })
    }
}

pub fn output_success<T: Serialize>(data: T) {
    let envelope = Envelope {
        success: true,
        api_version: API_VERSION,
        data: Some(data),
        error: None,
    };
    println!("{}", envelope.encode());
}

pub fn output_list<T: Serialize>(items: Vec<T>) {
    let count = items.len();
    output_success(Listing { items, count });
}

/// Writes the failure envelope to stderr and exits with status 1.
pub fn output_error(message: &str) -> ! {
    let envelope: Envelope<()> = Envelope {
        success: false,
        api_version: API_VERSION,
        data: None,
        error: Some(message.to_string()),
    };
    eprintln!("{}", envelope.encode());
    std::process::exit(1);
}
