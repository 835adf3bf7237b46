//! Small serde helpers for the handful of date/time encodings the API and
//! admin report filters accept beyond chrono's own `Serialize`/`Deserialize`.

pub mod date_time {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone as _};
    use serde::{de::Error, Deserialize, Deserializer};

    /// Parses a local, timezone-less timestamp of the form
    /// `"2026-07-28T14:00:00"`, as sent by admin report date filters.
    pub fn deserialize_local<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S")
            .map_err(Error::custom)?;
        Local
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| Error::custom("ambiguous or invalid local datetime"))
    }

    pub fn deserialize_local_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Wrapper(#[serde(deserialize_with = "deserialize_local")] DateTime<Local>);

        Option::<Wrapper>::deserialize(deserializer).map(|opt| opt.map(|w| w.0))
    }
}
