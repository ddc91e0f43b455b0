//! Wire types for the AdGuard Home control API
//!
//! These mirror the JSON bodies returned by `GET /control/clients` and
//! `GET /control/stats`. All fields default to empty/zero when the
//! appliance omits them.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A DNS client known to AdGuard Home
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    /// Client IP address
    #[serde(default)]
    pub ip: String,

    /// Client name (explicit or discovered)
    #[serde(default)]
    pub name: String,

    /// How the client was discovered (e.g. "rdns", "etc/hosts")
    #[serde(default)]
    pub source: String,

    /// WHOIS details, empty for local clients
    #[serde(default)]
    pub whois_info: WhoisInfo,
}

/// WHOIS details attached to a client record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhoisInfo {
    #[serde(default)]
    pub country: String,

    #[serde(default, rename = "orgname")]
    pub org_name: String,

    #[serde(default)]
    pub city: String,
}

/// Response body of `GET /control/clients`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientsResponse {
    /// Explicitly configured clients
    #[serde(default)]
    pub clients: Vec<Client>,

    /// Clients discovered automatically by the appliance
    #[serde(default)]
    pub auto_clients: Vec<Client>,

    /// Tags the appliance supports for client configuration
    #[serde(default)]
    pub supported_tags: Vec<String>,
}

impl ClientsResponse {
    /// All clients in presentation order: configured first, then
    /// auto-discovered, each in original API order, no dedup.
    pub fn all_clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter().chain(self.auto_clients.iter())
    }
}

/// One entry of a ranked list: a name and its metric.
///
/// The appliance encodes each entry as a single-key JSON object
/// (`{"example.com": 42}`). Deserialization takes the first key/value pair
/// and ignores any further pairs; an empty object is a decode error.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<V> {
    pub name: String,
    pub value: V,
}

impl<V: Serialize> Serialize for RankedEntry<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for RankedEntry<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntryVisitor<V> {
            type Value = RankedEntry<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with at least one entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (name, value) = map
                    .next_entry::<String, V>()?
                    .ok_or_else(|| de::Error::custom("ranked entry must not be empty"))?;
                // Drain whatever else the appliance sent; only the first
                // pair is meaningful.
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(RankedEntry { name, value })
            }
        }

        deserializer.deserialize_map(EntryVisitor(PhantomData))
    }
}

/// Response body of `GET /control/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Unit of the per-interval series ("hours" or "days")
    #[serde(default)]
    pub time_units: String,

    #[serde(default)]
    pub top_queried_domains: Vec<RankedEntry<u64>>,

    #[serde(default)]
    pub top_clients: Vec<RankedEntry<u64>>,

    #[serde(default)]
    pub top_blocked_domains: Vec<RankedEntry<u64>>,

    #[serde(default)]
    pub top_upstreams_responses: Vec<RankedEntry<u64>>,

    /// Average response time per upstream, in seconds
    #[serde(default)]
    pub top_upstreams_avg_time: Vec<RankedEntry<f64>>,

    /// Queries per interval over the stats window
    #[serde(default)]
    pub dns_queries: Vec<u64>,

    /// Blocked queries per interval over the stats window
    #[serde(default)]
    pub blocked_filtering: Vec<u64>,

    #[serde(default)]
    pub num_dns_queries: u64,

    #[serde(default)]
    pub num_blocked_filtering: u64,

    /// Average processing time in seconds
    #[serde(default)]
    pub avg_processing_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_entry_single_pair() {
        let entries: Vec<RankedEntry<u64>> =
            serde_json::from_str(r#"[{"example.com": 42}]"#).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "example.com");
        assert_eq!(entries[0].value, 42);
    }

    #[test]
    fn test_ranked_entry_extra_pairs_are_ignored() {
        let entry: RankedEntry<u64> =
            serde_json::from_str(r#"{"first.example": 1, "second.example": 2}"#).unwrap();
        assert_eq!(entry.name, "first.example");
        assert_eq!(entry.value, 1);
    }

    #[test]
    fn test_ranked_entry_empty_object_is_error() {
        let result: Result<RankedEntry<u64>, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_ranked_entry_float_values() {
        let entry: RankedEntry<f64> = serde_json::from_str(r#"{"1.1.1.1:53": 0.0123}"#).unwrap();
        assert_eq!(entry.name, "1.1.1.1:53");
        assert!((entry.value - 0.0123).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ranked_entry_serializes_to_single_key_map() {
        let entry = RankedEntry {
            name: "example.com".to_string(),
            value: 42u64,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"example.com":42}"#
        );
    }

    #[test]
    fn test_clients_response_order_preserved() {
        let json = r#"{
            "clients": [{"ip": "10.0.0.5", "name": "laptop", "source": "rdns",
                         "whois_info": {"country": "US", "orgname": "ISP", "city": "NYC"}}],
            "auto_clients": [{"ip": "10.0.0.7", "name": "phone", "source": "arp"}],
            "supported_tags": ["device_pc"]
        }"#;
        let response: ClientsResponse = serde_json::from_str(json).unwrap();
        let all: Vec<_> = response.all_clients().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ip, "10.0.0.5");
        assert_eq!(all[0].whois_info.org_name, "ISP");
        assert_eq!(all[1].ip, "10.0.0.7");
        // Missing whois_info falls back to empty fields
        assert_eq!(all[1].whois_info.country, "");
    }

    #[test]
    fn test_stats_response_missing_fields_default() {
        let stats: StatsResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.time_units, "");
        assert_eq!(stats.num_dns_queries, 0);
        assert!(stats.top_queried_domains.is_empty());
    }

    #[test]
    fn test_stats_response_full_body() {
        let json = r#"{
            "time_units": "hours",
            "top_queried_domains": [{"example.com": 42}, {"example.org": 7}],
            "top_clients": [{"10.0.0.5": 100}],
            "top_blocked_domains": [{"ads.example": 13}],
            "top_upstreams_responses": [{"1.1.1.1:53": 90}],
            "top_upstreams_avg_time": [{"1.1.1.1:53": 0.015625}],
            "dns_queries": [1, 2, 3],
            "blocked_filtering": [0, 1, 0],
            "num_dns_queries": 6,
            "num_blocked_filtering": 1,
            "avg_processing_time": 0.0042
        }"#;
        let stats: StatsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(stats.time_units, "hours");
        assert_eq!(stats.top_queried_domains[0].name, "example.com");
        assert_eq!(stats.top_queried_domains[1].value, 7);
        assert_eq!(stats.dns_queries, vec![1, 2, 3]);
        assert_eq!(stats.num_blocked_filtering, 1);
    }
}
