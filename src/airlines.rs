//! Airline display names keyed by IATA code

const AIRLINES: &[(&str, &str)] = &[
    ("0B", "Blue Air"),
    ("2L", "Helvetic Airways"),
    ("3K", "Jetstar Asia"),
    ("4U", "Eurowings"),
    ("5J", "Cebu Pacific"),
    ("6E", "IndiGo"),
    ("7C", "Jeju Air"),
    ("8M", "Myanmar Airways International"),
    ("9W", "Jet Airways"),
    ("AA", "American Airlines"),
    ("AC", "Air Canada"),
    ("AD", "Azul"),
    ("AF", "Air France"),
    ("AI", "Air India"),
    ("AK", "AirAsia"),
    ("AM", "Aeromexico"),
    ("AR", "Aerolineas Argentinas"),
    ("AS", "Alaska Airlines"),
    ("AT", "Royal Air Maroc"),
    ("AV", "Avianca"),
    ("AY", "Finnair"),
    ("AZ", "ITA Airways"),
    ("B6", "JetBlue Airways"),
    ("BA", "British Airways"),
    ("BR", "EVA Air"),
    ("BT", "airBaltic"),
    ("CA", "Air China"),
    ("CI", "China Airlines"),
    ("CM", "Copa Airlines"),
    ("CX", "Cathay Pacific"),
    ("CZ", "China Southern Airlines"),
    ("DE", "Condor"),
    ("DL", "Delta Air Lines"),
    ("DY", "Norwegian Air Shuttle"),
    ("EI", "Aer Lingus"),
    ("EK", "Emirates"),
    ("ET", "Ethiopian Airlines"),
    ("EW", "Eurowings"),
    ("EY", "Etihad Airways"),
    ("F9", "Frontier Airlines"),
    ("FI", "Icelandair"),
    ("FR", "Ryanair"),
    ("G3", "GOL Linhas Aereas"),
    ("GA", "Garuda Indonesia"),
    ("HA", "Hawaiian Airlines"),
    ("HV", "Transavia"),
    ("IB", "Iberia"),
    ("JL", "Japan Airlines"),
    ("JQ", "Jetstar Airways"),
    ("JU", "Air Serbia"),
    ("KE", "Korean Air"),
    ("KL", "KLM Royal Dutch Airlines"),
    ("KM", "KM Malta Airlines"),
    ("LA", "LATAM Airlines"),
    ("LH", "Lufthansa"),
    ("LO", "LOT Polish Airlines"),
    ("LS", "Jet2"),
    ("LX", "Swiss International Air Lines"),
    ("LY", "El Al"),
    ("MH", "Malaysia Airlines"),
    ("MS", "EgyptAir"),
    ("NH", "All Nippon Airways"),
    ("NK", "Spirit Airlines"),
    ("NZ", "Air New Zealand"),
    ("OK", "Czech Airlines"),
    ("OS", "Austrian Airlines"),
    ("OU", "Croatia Airlines"),
    ("PC", "Pegasus Airlines"),
    ("PR", "Philippine Airlines"),
    ("QF", "Qantas"),
    ("QR", "Qatar Airways"),
    ("RO", "TAROM"),
    ("SA", "South African Airways"),
    ("SK", "SAS"),
    ("SN", "Brussels Airlines"),
    ("SQ", "Singapore Airlines"),
    ("SU", "Aeroflot"),
    ("SV", "Saudia"),
    ("TG", "Thai Airways"),
    ("TK", "Turkish Airlines"),
    ("TP", "TAP Air Portugal"),
    ("U2", "easyJet"),
    ("UA", "United Airlines"),
    ("UX", "Air Europa"),
    ("VA", "Virgin Australia"),
    ("VN", "Vietnam Airlines"),
    ("VS", "Virgin Atlantic"),
    ("VY", "Vueling"),
    ("W6", "Wizz Air"),
    ("WN", "Southwest Airlines"),
    ("WS", "WestJet"),
    ("XQ", "SunExpress"),
];

/// Catalogue name for an airline code
pub fn airline_name(code: &str) -> Option<&'static str> {
    AIRLINES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Name to show for an airline; codes missing from the catalogue show as themselves
pub fn display_name(code: &str) -> String {
    airline_name(code).unwrap_or(code).to_string()
}
