use crate::catalog::schema::{Category, Coordinate, Currency, KnowledgeEntry, Program};

pub const REFERENCE_CURRENCY: &str = "USD";

pub fn default_programs() -> Vec<Program> {
    vec![
        // Airline PPM figures are economy saver estimates.
        Program::new("ua", "United MileagePlus", Category::Airline, 1.3).with_reference_ppm(10.0),
        Program::new("as", "Alaska Mileage Plan", Category::Airline, 1.4).with_reference_ppm(8.0),
        Program::new("dl", "Delta SkyMiles", Category::Airline, 1.2).with_reference_ppm(13.0),
        Program::new("aa", "American AAdvantage", Category::Airline, 1.7).with_reference_ppm(9.0),
        Program::new("jl", "Japan Airlines (JAL)", Category::Airline, 1.5).with_reference_ppm(8.0),
        Program::new("ce", "China Eastern", Category::Airline, 1.1).with_reference_ppm(11.0),
        Program::new("sw", "Southwest Rapid Rewards", Category::Airline, 1.3)
            .with_reference_ppm(16.0),
        Program::new("mb", "Marriott Bonvoy", Category::Hotel, 0.8),
        Program::new("hh", "Hilton Honors", Category::Hotel, 0.6),
        Program::new("hy", "World of Hyatt", Category::Hotel, 1.8),
        Program::new("ihg", "IHG One Rewards", Category::Hotel, 0.6),
        Program::new("chase", "Chase Ultimate Rewards", Category::Bank, 2.05),
        Program::new("bilt", "Bilt Rewards", Category::Bank, 2.0),
        Program::new("amex", "Amex Membership Rewards", Category::Bank, 2.0),
        Program::new("c1", "Capital One Miles", Category::Bank, 1.85),
    ]
}

pub fn default_currencies() -> Vec<Currency> {
    vec![
        Currency::new("USD", "$", "US Dollar", 1.0),
        Currency::new("EUR", "€", "Euro", 1.05),
        Currency::new("GBP", "£", "British Pound", 1.26),
        Currency::new("JPY", "¥", "Japanese Yen", 0.0066),
        Currency::new("CAD", "C$", "Canadian Dollar", 0.71),
        Currency::new("AUD", "A$", "Australian Dollar", 0.65),
        Currency::new("CNY", "¥", "Chinese Yuan", 0.14),
    ]
}

pub fn default_airports() -> Vec<(&'static str, Coordinate)> {
    vec![
        // US
        ("JFK", Coordinate::new(40.6413, -73.7781)),
        ("LAX", Coordinate::new(33.9416, -118.4085)),
        ("SFO", Coordinate::new(37.6213, -122.3790)),
        ("ORD", Coordinate::new(41.9742, -87.9073)),
        ("ATL", Coordinate::new(33.6407, -84.4277)),
        ("DFW", Coordinate::new(32.8998, -97.0403)),
        ("DEN", Coordinate::new(39.8561, -104.6737)),
        ("SEA", Coordinate::new(47.4502, -122.3088)),
        ("MIA", Coordinate::new(25.7959, -80.2870)),
        ("IAD", Coordinate::new(38.9531, -77.4565)),
        ("EWR", Coordinate::new(40.6895, -74.1745)),
        ("BOS", Coordinate::new(42.3656, -71.0096)),
        // Europe
        ("LHR", Coordinate::new(51.4700, -0.4543)),
        ("CDG", Coordinate::new(49.0097, 2.5479)),
        ("FRA", Coordinate::new(50.0379, 8.5622)),
        ("AMS", Coordinate::new(52.3105, 4.7683)),
        ("MAD", Coordinate::new(40.4839, -3.5679)),
        ("FCO", Coordinate::new(41.8003, 12.2389)),
        ("ZRH", Coordinate::new(47.4582, 8.5555)),
        ("IST", Coordinate::new(41.2753, 28.7519)),
        // Asia and Middle East
        ("HND", Coordinate::new(35.5494, 139.7798)),
        ("NRT", Coordinate::new(35.7720, 140.3929)),
        ("SIN", Coordinate::new(1.3644, 103.9915)),
        ("HKG", Coordinate::new(22.3080, 113.9185)),
        ("ICN", Coordinate::new(37.4602, 126.4407)),
        ("PEK", Coordinate::new(40.0799, 116.6031)),
        ("PVG", Coordinate::new(31.1443, 121.8083)),
        ("BKK", Coordinate::new(13.6900, 100.7501)),
        ("DXB", Coordinate::new(25.2532, 55.3657)),
        ("DOH", Coordinate::new(25.2731, 51.6080)),
        // Oceania
        ("SYD", Coordinate::new(-33.9399, 151.1753)),
        ("MEL", Coordinate::new(-37.6690, 144.8410)),
        ("AKL", Coordinate::new(-37.0082, 174.7850)),
        // Americas outside the US
        ("YYZ", Coordinate::new(43.6777, -79.6248)),
        ("YVR", Coordinate::new(49.1947, -123.1762)),
        ("MEX", Coordinate::new(19.4361, -99.0719)),
        ("GRU", Coordinate::new(-23.4356, -46.4731)),
    ]
}

pub fn default_knowledge_base() -> Vec<KnowledgeEntry> {
    [
        ("british airways", 1.5),
        ("avios", 1.5),
        ("virgin atlantic", 1.4),
        ("flying blue", 1.2),
        ("air france", 1.2),
        ("klm", 1.2),
        ("singapore airlines", 1.7),
        ("emirates", 1.2),
        ("cathay pacific", 1.3),
        ("ana", 1.4),
        ("wyndham", 1.1),
        ("choice hotels", 0.6),
        ("best western", 0.6),
        ("accor", 2.2),
    ]
    .into_iter()
    .map(|(fragment, value)| KnowledgeEntry::new(fragment, value))
    .collect()
}
