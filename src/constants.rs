/// Upstream and rendering constants shared across the crate

// Upstream case-data API
pub const DEFAULT_API_BASE: &str = "https://coronavirus-tracker-api.herokuapp.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const LOCATIONS_PATH: &str = "/v2/locations";
pub const LATEST_PATH: &str = "/v2/latest";

// Source identifiers understood by the upstream API
pub const SOURCE_NYT: &str = "nyt";
pub const SOURCE_JHU: &str = "jhu";

/// County and province rows only exist in the US feed
pub const US_COUNTRY_CODE: &str = "US";

// Case-type keys as they appear on the wire and in intent parameters
pub const CONFIRMED: &str = "confirmed";
pub const DEATHS: &str = "deaths";
pub const RECOVERED: &str = "recovered";
pub const ALL_CASE_TYPES: &str = "all";

// Response text
pub const RESPONSE_PREFIX: &str = "According to my latest data, there are";
pub const WORLDWIDE: &str = "worldwide";
pub const WELCOME_MESSAGE: &str = "Welcome to my agent!";
pub const FALLBACK_MESSAGES: [&str; 2] = ["I didn't understand", "I'm sorry, can you try again?"];
pub const UNAVAILABLE_MESSAGE: &str =
    "Sorry, I couldn't reach my data source right now. Please try again later.";

// Dialogflow intent display names
pub const WELCOME_INTENT: &str = "Default Welcome Intent";
pub const FALLBACK_INTENT: &str = "Default Fallback Intent";
pub const WORLDWIDE_STATS_INTENT: &str = "Worldwide Stats Intent";
pub const LOCATION_STATS_INTENT: &str = "Location Stats Intent";
