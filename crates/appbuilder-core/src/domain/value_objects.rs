//! Value objects: the closed sets of choices an application or service is
//! generated with.
//!
//! Every enum round-trips through its lower-case wire name (`as_str` /
//! `FromStr`), which is also the name of the template directory it selects
//! and the value persisted in the project record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| DomainError::UnsupportedValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

named_enum! {
    /// Build tool of the generated project.
    BuildTool, "build tool" {
        Maven => "maven",
        Gradle => "gradle",
    }
}

named_enum! {
    /// Message encoding used by generated models.
    EncodingType, "encoding type" {
        Quark => "quark",
        Protobuf => "protobuf",
    }
}

named_enum! {
    /// Messaging bus provider.
    MessagingProvider, "messaging provider" {
        Solace => "solace",
        #[serde(rename = "activemq")]
        ActiveMq => "activemq",
        Kafka => "kafka",
    }
}

named_enum! {
    /// Kind of service module.
    ServiceType, "service type" {
        Driver => "driver",
        Connector => "connector",
        Processor => "processor",
    }
}

named_enum! {
    /// High-availability model of a clusterable service.
    ServiceHaModel, "service HA model" {
        #[serde(rename = "sr")]
        StateReplication => "sr",
        #[serde(rename = "es")]
        EventSourcing => "es",
    }
}

impl Default for BuildTool {
    fn default() -> Self {
        Self::Maven
    }
}

impl Default for EncodingType {
    fn default() -> Self {
        Self::Quark
    }
}

impl Default for MessagingProvider {
    fn default() -> Self {
        Self::ActiveMq
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        Self::Processor
    }
}

impl MessagingProvider {
    /// Default bus connection string for the provider.
    pub const fn connection_string(&self) -> &'static str {
        match self {
            Self::Solace => "solace://solace.rumi.local:55555",
            Self::ActiveMq => {
                "activemq://activemq.rumi.local:61616?wireFormat.maxInactivityDuration=0"
            }
            Self::Kafka => "kafka://kafka.rumi.local:9092",
        }
    }

    /// Extra `<dependency>` block spliced into the generated POM.
    ///
    /// ActiveMQ ships with the runtime and needs nothing.
    pub fn dependency_snippet(&self) -> String {
        let artifact = match self {
            Self::Solace => "nvx-rumi-solace",
            Self::Kafka => "nvx-rumi-kafka",
            Self::ActiveMq => return String::new(),
        };

        let indent = "        ";
        format!(
            "{indent}\n\
             {indent}<dependency>\n\
             {indent}    <groupId>com.neeve</groupId>\n\
             {indent}    <artifactId>{artifact}</artifactId>\n\
             {indent}</dependency>\n"
        )
    }
}

impl ServiceType {
    /// Only processors can be clustered and carry an HA model.
    pub const fn is_clusterable(&self) -> bool {
        matches!(self, Self::Processor)
    }
}

impl ServiceHaModel {
    /// Name of the runtime HA policy the model maps to.
    pub const fn policy_name(&self) -> &'static str {
        match self {
            Self::StateReplication => "StateReplication",
            Self::EventSourcing => "EventSourcing",
        }
    }
}
