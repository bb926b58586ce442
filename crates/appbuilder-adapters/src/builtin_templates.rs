//! Built-in templates compiled into the binary.
//!
//! The table below mirrors an on-disk template package (see
//! [`crate::template_loader`]): every entry path starts with the template
//! path it belongs to, e.g. `maven/app/...` or `maven/config/processor/es/...`.
//!
//! # Layout
//!
//! - `maven/app` - parent POM, ROE module and system module with the
//!   application configuration document
//! - `maven/service/{driver,connector}` and `maven/service/processor/{sr,es}` -
//!   one service module each, with message (and for processors, state) models
//! - `maven/config/...` - configuration fragments; the directories above each
//!   `config.xml` name its insertion point in the configuration document
//!
//! The on-disk loader can be pointed at a copy of these templates produced by
//! [`EmbeddedTemplateLoader::entries`].

use appbuilder_core::{
    application::{ApplicationError, ports::TemplateLoader},
    domain::{RelativePath, TemplateTree},
    error::AppBuilderResult,
};
use tracing::{debug, instrument};

/// One embedded template entry. `content` is `None` for an empty directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedEntry {
    pub path: &'static str,
    pub content: Option<&'static str>,
}

const fn file(path: &'static str, content: &'static str) -> EmbeddedEntry {
    EmbeddedEntry {
        path,
        content: Some(content),
    }
}

const fn dir(path: &'static str) -> EmbeddedEntry {
    EmbeddedEntry {
        path,
        content: None,
    }
}

/// [`TemplateLoader`] over the built-in template table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplateLoader;

impl EmbeddedTemplateLoader {
    pub fn new() -> Self {
        Self
    }

    /// Every built-in entry, with its full template path.
    pub fn entries(&self) -> &'static [EmbeddedEntry] {
        TEMPLATES
    }
}

impl TemplateLoader for EmbeddedTemplateLoader {
    #[instrument(skip(self))]
    fn load(&self, template_path: &str) -> AppBuilderResult<TemplateTree> {
        let prefix = format!("{}/", template_path.trim_end_matches('/'));
        let mut tree = TemplateTree::new();

        for entry in TEMPLATES {
            let Some(relative) = entry.path.strip_prefix(&prefix) else {
                continue;
            };
            let path = RelativePath::try_new(relative)?;
            tree = match entry.content {
                Some(content) => tree.with_file(path, content),
                None => tree.with_directory(path),
            };
        }

        if tree.is_empty() {
            return Err(ApplicationError::TemplateNotFound {
                path: template_path.to_string(),
            }
            .into());
        }

        debug!(entries = tree.len(), "Loaded built-in template");
        Ok(tree)
    }
}

// ── Template table ────────────────────────────────────────────────────────────

static TEMPLATES: &[EmbeddedEntry] = &[
    // maven/app
    file("maven/app/{{ParentArtifactId}}/.gitignore", GITIGNORE),
    file("maven/app/{{ParentArtifactId}}/pom.xml", PARENT_POM),
    file("maven/app/{{ParentArtifactId}}/{{RoeArtifactId}}/pom.xml", ROE_POM),
    dir("maven/app/{{ParentArtifactId}}/{{RoeArtifactId}}/src/main/models"),
    file("maven/app/{{ParentArtifactId}}/{{SystemArtifactId}}/pom.xml", SYSTEM_POM),
    file("maven/app/{{ParentArtifactId}}/{{SystemArtifactId}}/conf/config.xml", SYSTEM_CONFIG),
    // maven/service/driver
    file("maven/service/driver/{{ServiceArtifactId}}/pom.xml", SERVICE_POM),
    file(
        "maven/service/driver/{{ServiceArtifactId}}/src/main/java/{{AppPackagePath}}/{{ServicePackagePath}}/Main.java",
        DRIVER_MAIN,
    ),
    file(
        "maven/service/driver/{{ServiceArtifactId}}/src/main/models/{{AppPackagePath}}/{{ServicePackagePath}}/messages/messages.xml",
        MESSAGES_MODEL,
    ),
    // maven/service/connector
    file("maven/service/connector/{{ServiceArtifactId}}/pom.xml", SERVICE_POM),
    file(
        "maven/service/connector/{{ServiceArtifactId}}/src/main/java/{{AppPackagePath}}/{{ServicePackagePath}}/Main.java",
        CONNECTOR_MAIN,
    ),
    file(
        "maven/service/connector/{{ServiceArtifactId}}/src/main/models/{{AppPackagePath}}/{{ServicePackagePath}}/messages/messages.xml",
        MESSAGES_MODEL,
    ),
    // maven/service/processor/sr
    file("maven/service/processor/sr/{{ServiceArtifactId}}/pom.xml", SERVICE_POM),
    file(
        "maven/service/processor/sr/{{ServiceArtifactId}}/src/main/java/{{AppPackagePath}}/{{ServicePackagePath}}/Main.java",
        PROCESSOR_SR_MAIN,
    ),
    file(
        "maven/service/processor/sr/{{ServiceArtifactId}}/src/main/models/{{AppPackagePath}}/{{ServicePackagePath}}/messages/messages.xml",
        MESSAGES_MODEL,
    ),
    file(
        "maven/service/processor/sr/{{ServiceArtifactId}}/src/main/models/{{AppPackagePath}}/{{ServicePackagePath}}/state/state.xml",
        STATE_MODEL,
    ),
    // maven/service/processor/es
    file("maven/service/processor/es/{{ServiceArtifactId}}/pom.xml", SERVICE_POM),
    file(
        "maven/service/processor/es/{{ServiceArtifactId}}/src/main/java/{{AppPackagePath}}/{{ServicePackagePath}}/Main.java",
        PROCESSOR_ES_MAIN,
    ),
    file(
        "maven/service/processor/es/{{ServiceArtifactId}}/src/main/models/{{AppPackagePath}}/{{ServicePackagePath}}/messages/messages.xml",
        MESSAGES_MODEL,
    ),
    file(
        "maven/service/processor/es/{{ServiceArtifactId}}/src/main/models/{{AppPackagePath}}/{{ServicePackagePath}}/state/state.xml",
        STATE_MODEL,
    ),
    // maven/config/driver
    file("maven/config/driver/buses/config.xml", BUS_FRAGMENT),
    file("maven/config/driver/apps/config.xml", APP_FRAGMENT),
    file("maven/config/driver/xvms/config.xml", XVM_FRAGMENT),
    // maven/config/connector
    file("maven/config/connector/buses/config.xml", BUS_FRAGMENT),
    file("maven/config/connector/apps/config.xml", APP_FRAGMENT),
    file("maven/config/connector/xvms/config.xml", XVM_FRAGMENT),
    // maven/config/processor/sr
    file("maven/config/processor/sr/buses/config.xml", BUS_FRAGMENT),
    file("maven/config/processor/sr/apps/config.xml", PROCESSOR_SR_APP_FRAGMENT),
    file("maven/config/processor/sr/xvms/config.xml", XVM_FRAGMENT),
    file("maven/config/processor/sr/profiles/dev/apps/config.xml", DEV_PROFILE_APP_FRAGMENT),
    // maven/config/processor/es
    file("maven/config/processor/es/buses/config.xml", BUS_FRAGMENT),
    file("maven/config/processor/es/apps/config.xml", PROCESSOR_ES_APP_FRAGMENT),
    file("maven/config/processor/es/xvms/config.xml", XVM_FRAGMENT),
    file("maven/config/processor/es/profiles/dev/apps/config.xml", DEV_PROFILE_APP_FRAGMENT),
];

// ── maven/app ─────────────────────────────────────────────────────────────────

const GITIGNORE: &str = "target/
rdat/
*.log
.idea/
*.iml
";

const PARENT_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <groupId>{{GroupId}}</groupId>
    <artifactId>{{ParentArtifactId}}</artifactId>
    <version>1.0-SNAPSHOT</version>
    <packaging>pom</packaging>
    <name>{{AppDisplayName}}</name>

    <properties>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
        <maven.compiler.release>17</maven.compiler.release>
        <rumi.version>{{RumiVersion}}</rumi.version>
        <rumi.bindings.version>{{RumiBindingsVersion}}</rumi.bindings.version>
        <rumi.mgmt.version>{{RumiMgmtVersion}}</rumi.mgmt.version>
        <rumi.encoding>{{EncodingType}}</rumi.encoding>
    </properties>

    <modules>
        <module>{{RoeArtifactId}}</module>
        <module>{{SystemArtifactId}}</module>
    </modules>

    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>com.neeve</groupId>
                <artifactId>nvx-rumi-api</artifactId>
                <version>${rumi.version}</version>
            </dependency>
            <dependency>
                <groupId>com.neeve</groupId>
                <artifactId>nvx-rumi-bindings</artifactId>
                <version>${rumi.bindings.version}</version>
            </dependency>
            <dependency>
                <groupId>{{GroupId}}</groupId>
                <artifactId>{{RoeArtifactId}}</artifactId>
                <version>${project.version}</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>
"#;

const ROE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>{{GroupId}}</groupId>
        <artifactId>{{ParentArtifactId}}</artifactId>
        <version>1.0-SNAPSHOT</version>
    </parent>
    <artifactId>{{RoeArtifactId}}</artifactId>
    <name>{{AppDisplayName}} - Roe</name>

    <dependencies>
        <dependency>
            <groupId>com.neeve</groupId>
            <artifactId>nvx-rumi-api</artifactId>
        </dependency>
    </dependencies>
</project>
"#;

const SYSTEM_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>{{GroupId}}</groupId>
        <artifactId>{{ParentArtifactId}}</artifactId>
        <version>1.0-SNAPSHOT</version>
    </parent>
    <artifactId>{{SystemArtifactId}}</artifactId>
    <name>{{AppDisplayName}} - System</name>

    <dependencies>
        <dependency>
            <groupId>com.neeve</groupId>
            <artifactId>nvx-rumi-bindings</artifactId>
        </dependency>
{{MessagingProviderDependency}}    </dependencies>
</project>
"#;

// Canonical form, so the first merge only rewrites it when something is added.
const SYSTEM_CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.neeveresearch.com/schema/x-ddl">
    <env>
        <nv.ddl.profiles>dev</nv.ddl.profiles>
        <nv.app.encoding>{{EncodingType}}</nv.app.encoding>
    </env>
    <buses/>
    <apps/>
    <xvms/>
    <profiles>
        <profile name="dev">
            <env>
                <nv.loglevel>info</nv.loglevel>
            </env>
        </profile>
    </profiles>
</model>
"#;

// ── maven/service ─────────────────────────────────────────────────────────────

const SERVICE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>{{GroupId}}</groupId>
        <artifactId>{{ParentArtifactId}}</artifactId>
        <version>1.0-SNAPSHOT</version>
    </parent>
    <artifactId>{{ServiceArtifactId}}</artifactId>
    <name>{{AppDisplayName}} - {{ServiceDisplayName}}</name>

    <properties>
        <service.type>{{ServiceType}}</service.type>
    </properties>

    <dependencies>
        <dependency>
            <groupId>{{GroupId}}</groupId>
            <artifactId>{{RoeArtifactId}}</artifactId>
        </dependency>
        <dependency>
            <groupId>com.neeve</groupId>
            <artifactId>nvx-rumi-api</artifactId>
        </dependency>
    </dependencies>
</project>
"#;

const DRIVER_MAIN: &str = r#"package {{AppPackageName}}.{{ServicePackageName}};

import com.neeve.aep.AepMessageSender;
import com.neeve.server.app.annotations.AppInjectionPoint;

import {{AppPackageName}}.{{ServicePackageName}}.messages.*;

public class Main {
    private AepMessageSender _messageSender;

    @AppInjectionPoint
    public void setMessageSender(AepMessageSender messageSender) {
        _messageSender = messageSender;
    }
}
"#;

const CONNECTOR_MAIN: &str = r#"package {{AppPackageName}}.{{ServicePackageName}};

import com.neeve.aep.AepMessageSender;
import com.neeve.aep.annotations.EventHandler;
import com.neeve.server.app.annotations.AppInjectionPoint;

import {{AppPackageName}}.{{ServicePackageName}}.messages.*;

public class Main {
    private AepMessageSender _messageSender;

    @AppInjectionPoint
    public void setMessageSender(AepMessageSender messageSender) {
        _messageSender = messageSender;
    }
}
"#;

const PROCESSOR_SR_MAIN: &str = r#"package {{AppPackageName}}.{{ServicePackageName}};

import com.neeve.aep.AepEngine;
import com.neeve.aep.AepMessageSender;
import com.neeve.aep.IAepApplicationStateFactory;
import com.neeve.server.app.annotations.AppHAPolicy;
import com.neeve.server.app.annotations.AppInjectionPoint;
import com.neeve.server.app.annotations.AppStateFactoryAccessor;
import com.neeve.sma.MessageView;

import {{AppPackageName}}.{{ServicePackageName}}.messages.*;
import {{AppPackageName}}.{{ServicePackageName}}.state.*;

@AppHAPolicy(value = AepEngine.HAPolicy.{{ServiceHAModel}})
public class Main {
    private AepMessageSender _messageSender;

    @AppStateFactoryAccessor
    public IAepApplicationStateFactory getStateFactory() {
        return new IAepApplicationStateFactory() {
            @Override
            final public Repository createState(final MessageView view) {
                return Repository.create();
            }
        };
    }

    @AppInjectionPoint
    public void setMessageSender(AepMessageSender messageSender) {
        _messageSender = messageSender;
    }
}
"#;

const PROCESSOR_ES_MAIN: &str = r#"package {{AppPackageName}}.{{ServicePackageName}};

import com.neeve.aep.AepEngine;
import com.neeve.aep.AepMessageSender;
import com.neeve.server.app.annotations.AppHAPolicy;
import com.neeve.server.app.annotations.AppInjectionPoint;

import {{AppPackageName}}.{{ServicePackageName}}.messages.*;

@AppHAPolicy(value = AepEngine.HAPolicy.{{ServiceHAModel}})
public class Main {
    private AepMessageSender _messageSender;

    @AppInjectionPoint
    public void setMessageSender(AepMessageSender messageSender) {
        _messageSender = messageSender;
    }
}
"#;

const MESSAGES_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.neeveresearch.com/schema/x-adml" namespace="{{AppPackageName}}.{{ServicePackageName}}.messages" defaultFactoryId="{{ServiceMessageModelId}}">
    <factories>
        <factory name="MessageFactory" id="{{ServiceMessageModelId}}"/>
    </factories>
    <messages/>
</model>
"#;

const STATE_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.neeveresearch.com/schema/x-adml" namespace="{{AppPackageName}}.{{ServicePackageName}}.state" defaultFactoryId="{{ServiceStateModelId}}">
    <factories>
        <factory name="StateFactory" id="{{ServiceStateModelId}}"/>
    </factories>
    <entities>
        <entity name="Repository" asState="true"/>
    </entities>
</model>
"#;

// ── maven/config ──────────────────────────────────────────────────────────────

// Identical for every service, so only the first one lands.
const BUS_FRAGMENT: &str = r#"<bus name="{{BusName}}">
    <provider>{{MessagingProvider}}</provider>
    <address>{{MessagingConnectionString}}</address>
</bus>
"#;

const APP_FRAGMENT: &str = r#"<app name="{{ServiceName}}" mainClass="{{AppPackageName}}.{{ServicePackageName}}.Main">
    <messaging>
        <factories>
            <factory name="{{AppPackageName}}.{{ServicePackageName}}.messages.MessageFactory"/>
        </factories>
        <bus name="{{BusName}}">
            <channels>
                <channel name="{{ServiceTokenName}}" join="true"/>
            </channels>
        </bus>
    </messaging>
</app>
"#;

const PROCESSOR_SR_APP_FRAGMENT: &str = r#"<app name="{{ServiceName}}" mainClass="{{AppPackageName}}.{{ServicePackageName}}.Main">
    <messaging>
        <factories>
            <factory name="{{AppPackageName}}.{{ServicePackageName}}.messages.MessageFactory"/>
        </factories>
        <bus name="{{BusName}}">
            <channels>
                <channel name="{{ServiceTokenName}}" join="true"/>
            </channels>
        </bus>
    </messaging>
    <storage enabled="true">
        <factories>
            <factory name="{{AppPackageName}}.{{ServicePackageName}}.state.StateFactory"/>
        </factories>
        <clustering enabled="true"/>
        <persistence enabled="true"/>
    </storage>
</app>
"#;

const PROCESSOR_ES_APP_FRAGMENT: &str = r#"<app name="{{ServiceName}}" mainClass="{{AppPackageName}}.{{ServicePackageName}}.Main">
    <messaging>
        <factories>
            <factory name="{{AppPackageName}}.{{ServicePackageName}}.messages.MessageFactory"/>
        </factories>
        <bus name="{{BusName}}">
            <channels>
                <channel name="{{ServiceTokenName}}" join="true"/>
            </channels>
        </bus>
    </messaging>
    <storage enabled="true">
        <clustering enabled="true"/>
        <persistence enabled="true">
            <flushUsingMappedMemory>true</flushUsingMappedMemory>
        </persistence>
    </storage>
</app>
"#;

const XVM_FRAGMENT: &str = r#"<xvm name="{{ServiceName}}-1">
    <apps>
        <app name="{{ServiceName}}" autoStart="true"/>
    </apps>
</xvm>
"#;

const DEV_PROFILE_APP_FRAGMENT: &str = r#"<app name="{{ServiceName}}">
    <storage>
        <persistence>
            <detachedPersist enabled="false"/>
        </persistence>
    </storage>
</app>
"#;
