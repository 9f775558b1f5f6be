//! Static route data backing the transportation sources.
//!
//! City-to-airport mapping, the known flight routes out of Dhaka, and
//! per-region defaults for anything not in the table. Pure lookups with no
//! hidden state, so every consumer is deterministic given its inputs.

/// Known flight route: base price in USD, flight hours, scheduled stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub base_price: f64,
    pub hours: f64,
    pub stops: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Airline {
    pub name: &'static str,
    pub code: &'static str,
}

/// Destination region, used to pick airline pools, hubs, and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    BangladeshDomestic,
    SouthAsia,
    MiddleEast,
    SoutheastAsia,
    EastAsia,
    Europe,
    Americas,
}

const AIRPORT_CODES: &[(&str, &str)] = &[
    // Bangladesh
    ("dhaka", "DAC"),
    ("chittagong", "CGP"),
    ("chattogram", "CGP"),
    ("sylhet", "ZYL"),
    ("cox's bazar", "CXB"),
    ("coxs bazar", "CXB"),
    ("rajshahi", "RJH"),
    ("jessore", "JSR"),
    ("barisal", "BZL"),
    ("saidpur", "SPD"),
    // India
    ("delhi", "DEL"),
    ("new delhi", "DEL"),
    ("mumbai", "BOM"),
    ("kolkata", "CCU"),
    ("chennai", "MAA"),
    ("bangalore", "BLR"),
    ("bengaluru", "BLR"),
    ("hyderabad", "HYD"),
    ("goa", "GOI"),
    ("jaipur", "JAI"),
    // Southeast Asia
    ("bangkok", "BKK"),
    ("singapore", "SIN"),
    ("kuala lumpur", "KUL"),
    ("jakarta", "CGK"),
    ("hanoi", "HAN"),
    ("ho chi minh", "SGN"),
    ("manila", "MNL"),
    // Middle East
    ("dubai", "DXB"),
    ("abu dhabi", "AUH"),
    ("doha", "DOH"),
    ("riyadh", "RUH"),
    ("jeddah", "JED"),
    ("muscat", "MCT"),
    // Europe
    ("london", "LHR"),
    ("paris", "CDG"),
    ("rome", "FCO"),
    ("madrid", "MAD"),
    ("berlin", "BER"),
    ("amsterdam", "AMS"),
    ("zurich", "ZRH"),
    ("vienna", "VIE"),
    ("budapest", "BUD"),
    ("buda", "BUD"),
    ("hungary", "BUD"),
    ("prague", "PRG"),
    ("warsaw", "WAW"),
    ("athens", "ATH"),
    ("istanbul", "IST"),
    ("moscow", "SVO"),
    ("lisbon", "LIS"),
    ("barcelona", "BCN"),
    ("munich", "MUC"),
    ("frankfurt", "FRA"),
    ("milan", "MXP"),
    // Americas
    ("new york", "JFK"),
    ("los angeles", "LAX"),
    ("chicago", "ORD"),
    ("toronto", "YYZ"),
    ("san francisco", "SFO"),
    ("miami", "MIA"),
    ("washington", "IAD"),
    ("boston", "BOS"),
    // East Asia
    ("tokyo", "NRT"),
    ("beijing", "PEK"),
    ("shanghai", "PVG"),
    ("seoul", "ICN"),
    ("hong kong", "HKG"),
    ("taipei", "TPE"),
    // Oceania
    ("sydney", "SYD"),
    ("melbourne", "MEL"),
    ("auckland", "AKL"),
    // Africa
    ("cairo", "CAI"),
    ("nairobi", "NBO"),
    ("cape town", "CPT"),
    ("johannesburg", "JNB"),
    ("lagos", "LOS"),
    ("casablanca", "CMN"),
];

/// Resolve a city name to an IATA code. Exact match first, then a
/// substring match in either direction for inputs like "Dhaka Airport".
pub fn airport_code(city: &str) -> Option<&'static str> {
    let needle = city.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some((_, code)) = AIRPORT_CODES.iter().find(|(name, _)| *name == needle) {
        return Some(code);
    }
    AIRPORT_CODES
        .iter()
        .find(|(name, _)| needle.contains(name) || name.contains(needle.as_str()))
        .map(|(_, code)| *code)
}

// Routes out of Dhaka: (destination, base USD price, hours, stops).
const DAC_ROUTES: &[(&str, Route)] = &[
    ("CGP", Route { base_price: 60.0, hours: 0.75, stops: 0 }),
    ("ZYL", Route { base_price: 55.0, hours: 0.7, stops: 0 }),
    ("CXB", Route { base_price: 70.0, hours: 1.0, stops: 0 }),
    ("RJH", Route { base_price: 55.0, hours: 0.65, stops: 0 }),
    ("JSR", Route { base_price: 60.0, hours: 0.8, stops: 0 }),
    ("DEL", Route { base_price: 150.0, hours: 2.5, stops: 0 }),
    ("CCU", Route { base_price: 90.0, hours: 1.0, stops: 0 }),
    ("BOM", Route { base_price: 200.0, hours: 3.5, stops: 0 }),
    ("BLR", Route { base_price: 220.0, hours: 3.5, stops: 1 }),
    ("MAA", Route { base_price: 200.0, hours: 3.0, stops: 0 }),
    ("DXB", Route { base_price: 350.0, hours: 5.5, stops: 0 }),
    ("DOH", Route { base_price: 320.0, hours: 5.0, stops: 0 }),
    ("RUH", Route { base_price: 380.0, hours: 6.0, stops: 0 }),
    ("JED", Route { base_price: 400.0, hours: 6.5, stops: 0 }),
    ("AUH", Route { base_price: 340.0, hours: 5.5, stops: 0 }),
    ("MCT", Route { base_price: 300.0, hours: 5.0, stops: 0 }),
    ("BKK", Route { base_price: 200.0, hours: 2.5, stops: 0 }),
    ("SIN", Route { base_price: 280.0, hours: 4.0, stops: 0 }),
    ("KUL", Route { base_price: 250.0, hours: 3.5, stops: 0 }),
    ("LHR", Route { base_price: 550.0, hours: 11.0, stops: 1 }),
    ("CDG", Route { base_price: 520.0, hours: 11.0, stops: 1 }),
    ("BER", Route { base_price: 500.0, hours: 10.0, stops: 1 }),
    ("AMS", Route { base_price: 530.0, hours: 10.5, stops: 1 }),
    ("BUD", Route { base_price: 480.0, hours: 10.0, stops: 1 }),
    ("VIE", Route { base_price: 490.0, hours: 10.0, stops: 1 }),
    ("IST", Route { base_price: 380.0, hours: 7.0, stops: 0 }),
    ("FCO", Route { base_price: 520.0, hours: 10.0, stops: 1 }),
    ("MAD", Route { base_price: 580.0, hours: 12.0, stops: 1 }),
    ("FRA", Route { base_price: 510.0, hours: 10.0, stops: 1 }),
    ("PRG", Route { base_price: 490.0, hours: 10.0, stops: 1 }),
    ("WAW", Route { base_price: 470.0, hours: 9.5, stops: 1 }),
    ("MUC", Route { base_price: 500.0, hours: 10.0, stops: 1 }),
    ("ATH", Route { base_price: 430.0, hours: 9.0, stops: 1 }),
    ("ZRH", Route { base_price: 520.0, hours: 10.0, stops: 1 }),
    ("BCN", Route { base_price: 560.0, hours: 11.5, stops: 1 }),
    ("LIS", Route { base_price: 600.0, hours: 13.0, stops: 1 }),
    ("SVO", Route { base_price: 400.0, hours: 8.0, stops: 1 }),
    ("MXP", Route { base_price: 510.0, hours: 10.0, stops: 1 }),
    ("PEK", Route { base_price: 350.0, hours: 5.0, stops: 0 }),
    ("PVG", Route { base_price: 340.0, hours: 5.0, stops: 0 }),
    ("HKG", Route { base_price: 280.0, hours: 3.5, stops: 0 }),
    ("NRT", Route { base_price: 450.0, hours: 7.0, stops: 1 }),
    ("ICN", Route { base_price: 400.0, hours: 6.0, stops: 0 }),
    ("TPE", Route { base_price: 330.0, hours: 5.0, stops: 0 }),
    ("JFK", Route { base_price: 750.0, hours: 18.0, stops: 1 }),
    ("LAX", Route { base_price: 800.0, hours: 20.0, stops: 1 }),
    ("ORD", Route { base_price: 720.0, hours: 18.0, stops: 1 }),
    ("YYZ", Route { base_price: 700.0, hours: 17.0, stops: 1 }),
    ("SFO", Route { base_price: 780.0, hours: 19.0, stops: 1 }),
    ("MIA", Route { base_price: 770.0, hours: 19.0, stops: 1 }),
    ("SYD", Route { base_price: 600.0, hours: 13.0, stops: 1 }),
    ("MEL", Route { base_price: 620.0, hours: 14.0, stops: 1 }),
    ("CAI", Route { base_price: 380.0, hours: 7.0, stops: 1 }),
    ("NBO", Route { base_price: 420.0, hours: 8.0, stops: 1 }),
    ("JNB", Route { base_price: 580.0, hours: 12.0, stops: 1 }),
];

/// Look up route data for a code pair, in either direction.
pub fn route_between(from: &str, to: &str) -> Option<Route> {
    let lookup = |origin: &str, dest: &str| {
        (origin == "DAC")
            .then(|| DAC_ROUTES.iter().find(|(code, _)| *code == dest))
            .flatten()
            .map(|(_, route)| *route)
    };
    lookup(from, to).or_else(|| lookup(to, from))
}

/// Classify an airport code into a region. Unlisted codes fall back to
/// Europe, which keeps pricing defaults conservative for long-haul.
pub fn region_of(code: &str) -> Region {
    const BD: &[&str] = &["DAC", "CGP", "ZYL", "CXB", "RJH", "JSR", "BZL", "SPD"];
    const SA: &[&str] = &["DEL", "BOM", "CCU", "MAA", "BLR", "HYD", "GOI", "JAI"];
    const ME: &[&str] = &["DXB", "DOH", "RUH", "JED", "AUH", "MCT"];
    const SEA: &[&str] = &["BKK", "SIN", "KUL", "CGK", "HAN", "SGN", "MNL"];
    const EA: &[&str] = &["NRT", "PEK", "PVG", "ICN", "HKG", "TPE"];
    const AM: &[&str] = &["JFK", "LAX", "ORD", "YYZ", "SFO", "MIA", "IAD", "BOS"];

    if BD.contains(&code) {
        Region::BangladeshDomestic
    } else if SA.contains(&code) {
        Region::SouthAsia
    } else if ME.contains(&code) {
        Region::MiddleEast
    } else if SEA.contains(&code) {
        Region::SoutheastAsia
    } else if EA.contains(&code) {
        Region::EastAsia
    } else if AM.contains(&code) {
        Region::Americas
    } else {
        Region::Europe
    }
}

impl Region {
    /// Fallback base price (USD) for routes missing from the table.
    pub fn default_price(self) -> f64 {
        match self {
            Self::BangladeshDomestic => 50.0,
            Self::SouthAsia => 150.0,
            Self::MiddleEast => 350.0,
            Self::SoutheastAsia => 250.0,
            Self::EastAsia => 400.0,
            Self::Europe => 500.0,
            Self::Americas => 750.0,
        }
    }

    /// Fallback flight hours for routes missing from the table.
    pub fn default_hours(self) -> f64 {
        match self {
            Self::BangladeshDomestic => 1.0,
            Self::SouthAsia => 2.5,
            Self::MiddleEast => 5.5,
            Self::SoutheastAsia => 3.5,
            Self::EastAsia => 6.0,
            Self::Europe => 10.0,
            Self::Americas => 18.0,
        }
    }

    /// Airlines that plausibly serve the region from Bangladesh.
    pub fn airlines(self) -> &'static [Airline] {
        match self {
            Self::BangladeshDomestic => &[
                Airline { name: "Biman Bangladesh Airlines", code: "BG" },
                Airline { name: "US-Bangla Airlines", code: "BS" },
                Airline { name: "Novoair", code: "VQ" },
            ],
            Self::SouthAsia => &[
                Airline { name: "Biman Bangladesh Airlines", code: "BG" },
                Airline { name: "IndiGo", code: "6E" },
                Airline { name: "Air India", code: "AI" },
            ],
            Self::MiddleEast => &[
                Airline { name: "Emirates", code: "EK" },
                Airline { name: "Qatar Airways", code: "QR" },
                Airline { name: "Saudi Airlines", code: "SV" },
                Airline { name: "Biman Bangladesh Airlines", code: "BG" },
                Airline { name: "flydubai", code: "FZ" },
            ],
            Self::SoutheastAsia => &[
                Airline { name: "Singapore Airlines", code: "SQ" },
                Airline { name: "Thai Airways", code: "TG" },
                Airline { name: "Malaysia Airlines", code: "MH" },
                Airline { name: "AirAsia", code: "AK" },
                Airline { name: "Biman Bangladesh Airlines", code: "BG" },
            ],
            Self::EastAsia => &[
                Airline { name: "China Southern", code: "CZ" },
                Airline { name: "Cathay Pacific", code: "CX" },
                Airline { name: "Korean Air", code: "KE" },
                Airline { name: "Singapore Airlines", code: "SQ" },
            ],
            Self::Europe => &[
                Airline { name: "Turkish Airlines", code: "TK" },
                Airline { name: "Qatar Airways", code: "QR" },
                Airline { name: "Emirates", code: "EK" },
                Airline { name: "Singapore Airlines", code: "SQ" },
                Airline { name: "Etihad Airways", code: "EY" },
            ],
            Self::Americas => &[
                Airline { name: "Emirates", code: "EK" },
                Airline { name: "Qatar Airways", code: "QR" },
                Airline { name: "Turkish Airlines", code: "TK" },
                Airline { name: "British Airways", code: "BA" },
            ],
        }
    }

    /// Connecting hubs used in one-stop itineraries toward the region.
    pub fn hubs(self) -> &'static [&'static str] {
        match self {
            Self::Europe => &["Istanbul (IST)", "Dubai (DXB)", "Doha (DOH)", "Abu Dhabi (AUH)"],
            Self::Americas => &["Dubai (DXB)", "London (LHR)", "Istanbul (IST)"],
            Self::EastAsia => &["Singapore (SIN)", "Bangkok (BKK)", "Hong Kong (HKG)"],
            Self::SoutheastAsia => &["Singapore (SIN)", "Kuala Lumpur (KUL)"],
            Self::SouthAsia => &["Kolkata (CCU)", "Delhi (DEL)"],
            Self::MiddleEast | Self::BangladeshDomestic => &[],
        }
    }
}
