//! Static IP answer-file fragment.
//!
//! Static addressing is optional. When used, all six network parameters must
//! be given together; the fragment then carries a `Microsoft-Windows-TCPIP`
//! and a `Microsoft-Windows-DNS-Client` component for each processor
//! architecture setup may apply it to.

use tracing::debug;

use crate::error::{WinSetupError, WinSetupResult};
use crate::params::{BuildParameters, ParamKey};
use crate::xml;

/// Processor architectures that receive network components, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X86,
    Amd64,
}

impl Architecture {
    pub const ALL: [Architecture; 2] = [Architecture::X86, Architecture::Amd64];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::Amd64 => "amd64",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complete static IP configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIpConfig {
    pub interface_identifier: String,
    pub ip_address: String,
    pub routes_prefix: String,
    pub next_hop_address: String,
    pub dns_server_address: String,
    pub secondary_dns_server: String,
}

impl StaticIpConfig {
    /// Extract the static IP group from the build parameters.
    ///
    /// Returns `Ok(None)` when none of the six parameters is set and
    /// [`WinSetupError::IncompleteStaticIpConfig`] naming every missing key
    /// when only some are.
    pub fn from_params(params: &BuildParameters) -> WinSetupResult<Option<Self>> {
        let missing = params.missing(&ParamKey::STATIC_IP);
        if missing.len() == ParamKey::STATIC_IP.len() {
            return Ok(None);
        }
        if !missing.is_empty() {
            return Err(WinSetupError::IncompleteStaticIpConfig(
                missing.iter().map(|key| key.as_str().to_string()).collect(),
            ));
        }

        let field = |key: ParamKey| params.text(key).unwrap_or_default().to_string();
        Ok(Some(Self {
            interface_identifier: field(ParamKey::NetworkInterface),
            ip_address: field(ParamKey::StaticIpAddressCidr),
            routes_prefix: field(ParamKey::StaticRouteCidr),
            next_hop_address: field(ParamKey::StaticGatewayIp),
            dns_server_address: field(ParamKey::StaticDnsServer),
            secondary_dns_server: field(ParamKey::StaticSecondaryDnsServer),
        }))
    }

    /// Render the interface and DNS components for every architecture.
    pub fn to_fragment(&self) -> String {
        Architecture::ALL
            .iter()
            .map(|arch| {
                format!(
                    "{}\n            {}",
                    self.interface_component(*arch),
                    self.dns_component(*arch)
                )
            })
            .collect()
    }

    fn interface_component(&self, arch: Architecture) -> String {
        format!(
            r#"<component name="Microsoft-Windows-TCPIP" processorArchitecture="{arch}" publicKeyToken="31bf3856ad364e35" language="neutral" versionScope="nonSxS" xmlns:wcm="http://schemas.microsoft.com/WMIConfig/2002/State" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
                <Interfaces>
                    <Interface wcm:action="add">
                        <Ipv4Settings>
                            <DhcpEnabled>false</DhcpEnabled>
                        </Ipv4Settings>
                        <Identifier>{identifier}</Identifier>
                        <UnicastIpAddresses>
                            <IpAddress wcm:action="add" wcm:keyValue="1">{ip}</IpAddress>
                        </UnicastIpAddresses>
                        <Routes>
                            <Route wcm:action="add">
                                <Identifier>0</Identifier>
                                <Prefix>{prefix}</Prefix>
                                <NextHopAddress>{next_hop}</NextHopAddress>
                            </Route>
                        </Routes>
                    </Interface>
                </Interfaces>
            </component>"#,
            arch = arch,
            identifier = xml::escape(&self.interface_identifier),
            ip = xml::escape(&self.ip_address),
            prefix = xml::escape(&self.routes_prefix),
            next_hop = xml::escape(&self.next_hop_address),
        )
    }

    fn dns_component(&self, arch: Architecture) -> String {
        format!(
            r#"<component name="Microsoft-Windows-DNS-Client" processorArchitecture="{arch}" publicKeyToken="31bf3856ad364e35" language="neutral" versionScope="nonSxS" xmlns:wcm="http://schemas.microsoft.com/WMIConfig/2002/State" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
                <Interfaces>
                    <Interface wcm:action="add">
                        <Identifier>{identifier}</Identifier>
                        <DNSServerSearchOrder>
                            <IpAddress wcm:action="add" wcm:keyValue="1">{primary}</IpAddress>
                            <IpAddress wcm:action="add" wcm:keyValue="2">{secondary}</IpAddress>
                        </DNSServerSearchOrder>
                    </Interface>
                </Interfaces>
            </component>"#,
            arch = arch,
            identifier = xml::escape(&self.interface_identifier),
            primary = xml::escape(&self.dns_server_address),
            secondary = xml::escape(&self.secondary_dns_server),
        )
    }
}

/// Builds the network override fragment for the answer file.
pub struct StaticNetworkConfigBuilder;

impl StaticNetworkConfigBuilder {
    /// Build the fragment, or an empty string when no static IP is requested.
    pub fn build_network_fragment(params: &BuildParameters) -> WinSetupResult<String> {
        match StaticIpConfig::from_params(params)? {
            Some(config) => {
                debug!(
                    "Static IP {} on interface {}",
                    config.ip_address, config.interface_identifier
                );
                Ok(config.to_fragment())
            }
            None => {
                debug!("No static IP configuration, using DHCP");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_params() -> BuildParameters {
        BuildParameters::new()
            .with(ParamKey::NetworkInterface, "Ethernet")
            .unwrap()
            .with(ParamKey::StaticIpAddressCidr, "192.168.1.50/24")
            .unwrap()
            .with(ParamKey::StaticRouteCidr, "0.0.0.0/0")
            .unwrap()
            .with(ParamKey::StaticGatewayIp, "192.168.1.1")
            .unwrap()
            .with(ParamKey::StaticDnsServer, "1.1.1.1")
            .unwrap()
            .with(ParamKey::StaticSecondaryDnsServer, "8.8.8.8")
            .unwrap()
    }

    fn clear(params: &mut BuildParameters, key: ParamKey) {
        match key {
            ParamKey::NetworkInterface => params.network_interface = None,
            ParamKey::StaticIpAddressCidr => params.static_ip_address_cidr = None,
            ParamKey::StaticRouteCidr => params.static_route_cidr = None,
            ParamKey::StaticGatewayIp => params.static_gateway_ip = None,
            ParamKey::StaticDnsServer => params.static_dns_server = None,
            ParamKey::StaticSecondaryDnsServer => params.static_secondary_dns_server = None,
            other => panic!("{other} is not a static IP key"),
        }
    }

    #[test]
    fn test_no_static_ip_gives_empty_fragment() {
        let fragment =
            StaticNetworkConfigBuilder::build_network_fragment(&BuildParameters::new()).unwrap();
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_every_partial_combination_fails() {
        let keys = ParamKey::STATIC_IP;
        let mut failures = 0;
        // Bits set in `mask` are the keys removed from a complete configuration.
        for mask in 1u32..(1 << keys.len()) - 1 {
            let mut params = full_params();
            let mut expected = Vec::new();
            for (bit, key) in keys.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    clear(&mut params, *key);
                    expected.push(key.as_str().to_string());
                }
            }

            match StaticNetworkConfigBuilder::build_network_fragment(&params) {
                Err(WinSetupError::IncompleteStaticIpConfig(missing)) => {
                    assert_eq!(missing, expected, "mask {mask:06b}");
                    failures += 1;
                }
                other => panic!("mask {mask:06b}: expected failure, got {other:?}"),
            }
        }
        assert_eq!(failures, 62);
    }

    #[test]
    fn test_fragment_has_both_architectures_in_order() {
        let fragment = StaticNetworkConfigBuilder::build_network_fragment(&full_params()).unwrap();

        let x86 = fragment.find(r#"processorArchitecture="x86""#).unwrap();
        let amd64 = fragment.find(r#"processorArchitecture="amd64""#).unwrap();
        assert!(x86 < amd64);
        assert_eq!(fragment.matches("Microsoft-Windows-TCPIP").count(), 2);
        assert_eq!(fragment.matches("Microsoft-Windows-DNS-Client").count(), 2);
        assert!(fragment.starts_with("<component"));
        assert!(fragment.ends_with("</component>"));
    }

    #[test]
    fn test_fields_appear_in_order_per_architecture() {
        let fragment = StaticNetworkConfigBuilder::build_network_fragment(&full_params()).unwrap();
        let values = [
            "<Identifier>Ethernet</Identifier>",
            ">192.168.1.50/24</IpAddress>",
            "<Prefix>0.0.0.0/0</Prefix>",
            "<NextHopAddress>192.168.1.1</NextHopAddress>",
            "<Identifier>Ethernet</Identifier>",
            r#"wcm:keyValue="1">1.1.1.1</IpAddress>"#,
            r#"wcm:keyValue="2">8.8.8.8</IpAddress>"#,
        ];

        let mut cursor = 0;
        for _ in Architecture::ALL {
            for value in values {
                let offset = fragment[cursor..]
                    .find(value)
                    .unwrap_or_else(|| panic!("{value} missing after offset {cursor}"));
                cursor += offset + value.len();
            }
        }
    }

    #[test]
    fn test_interface_block_precedes_dns_block() {
        let fragment = StaticNetworkConfigBuilder::build_network_fragment(&full_params()).unwrap();
        let tcpip: Vec<_> = fragment.match_indices("Microsoft-Windows-TCPIP").map(|(i, _)| i).collect();
        let dns: Vec<_> = fragment
            .match_indices("Microsoft-Windows-DNS-Client")
            .map(|(i, _)| i)
            .collect();
        assert!(tcpip[0] < dns[0]);
        assert!(dns[0] < tcpip[1]);
        assert!(tcpip[1] < dns[1]);
    }

    #[test]
    fn test_values_are_escaped() {
        let params = full_params().with(ParamKey::NetworkInterface, "LAN & Uplink").unwrap();
        let fragment = StaticNetworkConfigBuilder::build_network_fragment(&params).unwrap();
        assert!(fragment.contains("<Identifier>LAN &amp; Uplink</Identifier>"));
        assert!(!fragment.contains("LAN & Uplink"));
    }

    #[test]
    fn test_deterministic() {
        let params = full_params();
        assert_eq!(
            StaticNetworkConfigBuilder::build_network_fragment(&params).unwrap(),
            StaticNetworkConfigBuilder::build_network_fragment(&params).unwrap()
        );
    }
}
