//! POM documents for publication: an immutable value type, an XML writer,
//! the root-proxy rewrites, and a focused parser for verification.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use kpub_core::coordinates::MavenCoordinates;
use kpub_util::errors::{KpubError, KpubResult};

const POM_XMLNS: &str = "http://maven.apache.org/POM/4.0.0";
const POM_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const POM_SCHEMA_LOCATION: &str =
    "http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd";

/// A POM document for one publication.
///
/// Value semantics: the root-proxy rewrites return new documents instead of
/// mutating this one, so a document handed to a later pipeline stage can
/// never change underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomDocument {
    pub coordinates: MavenCoordinates,
    /// `None` means the default `jar` packaging and the element is omitted.
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub licenses: Vec<License>,
    pub developers: Vec<Developer>,
    pub scm: Option<Scm>,
    pub dependencies: Vec<PomDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scm {
    pub url: Option<String>,
    pub connection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: Option<String>,
    pub optional: bool,
}

impl PomDocument {
    pub fn new(coordinates: MavenCoordinates) -> Self {
        Self {
            coordinates,
            packaging: None,
            name: None,
            description: None,
            url: None,
            licenses: Vec::new(),
            developers: Vec::new(),
            scm: None,
            dependencies: Vec::new(),
        }
    }

    /// This document re-identified as the root publication.
    ///
    /// Everything is kept except the coordinates, which become the root's,
    /// and a `name` equal to the old artifact id, which follows the rename.
    pub fn proxied_to(&self, root: &MavenCoordinates) -> PomDocument {
        let mut doc = self.clone();
        if doc.name.as_deref() == Some(self.coordinates.artifact_id.as_str()) {
            doc.name = Some(root.artifact_id.clone());
        }
        doc.coordinates = root.clone();
        doc
    }

    /// A metadata-only root document that depends on this publication.
    ///
    /// Packaging becomes `pom` and the dependency list is replaced by one
    /// compile-scope edge on this document's coordinates.
    pub fn dependency_proxy(&self, root: &MavenCoordinates) -> PomDocument {
        let mut doc = self.proxied_to(root);
        doc.packaging = Some("pom".into());
        doc.dependencies = vec![PomDependency {
            group_id: self.coordinates.group_id.clone(),
            artifact_id: self.coordinates.artifact_id.clone(),
            version: self.coordinates.version.clone(),
            scope: Some("compile".into()),
            optional: false,
        }];
        doc
    }

    /// Serialize to the canonical XML form.
    pub fn to_xml(&self) -> KpubResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_document(&mut writer)
            .map_err(|e| KpubError::Generic {
                message: format!("Failed to write POM XML: {e}"),
            })?;
        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| {
            KpubError::Generic {
                message: format!("POM serialization produced invalid UTF-8: {e}"),
            }
        })?;
        xml.push('\n');
        Ok(xml)
    }

    fn write_document(&self, writer: &mut Writer<Vec<u8>>) -> quick_xml::Result<()> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut project = BytesStart::new("project");
        project.push_attribute(("xmlns", POM_XMLNS));
        project.push_attribute(("xmlns:xsi", POM_XSI));
        project.push_attribute(("xsi:schemaLocation", POM_SCHEMA_LOCATION));
        writer.write_event(Event::Start(project))?;

        text_element(writer, "modelVersion", "4.0.0")?;
        text_element(writer, "groupId", &self.coordinates.group_id)?;
        text_element(writer, "artifactId", &self.coordinates.artifact_id)?;
        text_element(writer, "version", &self.coordinates.version)?;
        if let Some(packaging) = &self.packaging {
            text_element(writer, "packaging", packaging)?;
        }
        if let Some(name) = &self.name {
            text_element(writer, "name", name)?;
        }
        if let Some(description) = &self.description {
            text_element(writer, "description", description)?;
        }
        if let Some(url) = &self.url {
            text_element(writer, "url", url)?;
        }

        if !self.licenses.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("licenses")))?;
            for license in &self.licenses {
                writer.write_event(Event::Start(BytesStart::new("license")))?;
                text_element(writer, "name", &license.name)?;
                text_element(writer, "url", &license.url)?;
                writer.write_event(Event::End(BytesEnd::new("license")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("licenses")))?;
        }

        if !self.developers.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("developers")))?;
            for developer in &self.developers {
                writer.write_event(Event::Start(BytesStart::new("developer")))?;
                text_element(writer, "id", &developer.id)?;
                if let Some(name) = &developer.name {
                    text_element(writer, "name", name)?;
                }
                if let Some(email) = &developer.email {
                    text_element(writer, "email", email)?;
                }
                if let Some(url) = &developer.url {
                    text_element(writer, "url", url)?;
                }
                writer.write_event(Event::End(BytesEnd::new("developer")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("developers")))?;
        }

        if let Some(scm) = &self.scm {
            writer.write_event(Event::Start(BytesStart::new("scm")))?;
            if let Some(url) = &scm.url {
                text_element(writer, "url", url)?;
            }
            if let Some(connection) = &scm.connection {
                text_element(writer, "connection", connection)?;
            }
            writer.write_event(Event::End(BytesEnd::new("scm")))?;
        }

        if !self.dependencies.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("dependencies")))?;
            for dependency in &self.dependencies {
                writer.write_event(Event::Start(BytesStart::new("dependency")))?;
                text_element(writer, "groupId", &dependency.group_id)?;
                text_element(writer, "artifactId", &dependency.artifact_id)?;
                text_element(writer, "version", &dependency.version)?;
                if let Some(scope) = &dependency.scope {
                    text_element(writer, "scope", scope)?;
                }
                if dependency.optional {
                    text_element(writer, "optional", "true")?;
                }
                writer.write_event(Event::End(BytesEnd::new("dependency")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("dependencies")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("project")))?;
        Ok(())
    }
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Parse a publication POM back into a [`PomDocument`].
///
/// Covers the subset of POM this tool emits; used to verify rewrites and
/// staged output rather than to consume arbitrary third-party POMs.
pub fn parse_pom(xml: &str) -> KpubResult<PomDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut group_id = None;
    let mut artifact_id = None;
    let mut version = None;
    let mut packaging = None;
    let mut name = None;
    let mut description = None;
    let mut url = None;
    let mut licenses = Vec::new();
    let mut developers = Vec::new();
    let mut scm: Option<Scm> = None;
    let mut dependencies = Vec::new();

    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();
    let mut current_license: Option<License> = None;
    let mut current_developer: Option<Developer> = None;
    let mut current_dependency: Option<PomDependency> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                match path_context(&path).as_str() {
                    "project>licenses>license" => {
                        current_license = Some(License {
                            name: String::new(),
                            url: String::new(),
                        });
                    }
                    "project>developers>developer" => {
                        current_developer = Some(Developer {
                            id: String::new(),
                            name: None,
                            email: None,
                            url: None,
                        });
                    }
                    "project>dependencies>dependency" => {
                        current_dependency = Some(PomDependency {
                            group_id: String::new(),
                            artifact_id: String::new(),
                            version: String::new(),
                            scope: None,
                            optional: false,
                        });
                    }
                    "project>scm" => {
                        scm = Some(Scm {
                            url: None,
                            connection: None,
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let leaf = path.last().map(|s| s.as_str()).unwrap_or_default();

                if path.len() == 2 {
                    match leaf {
                        "groupId" => group_id = Some(text_buf.clone()),
                        "artifactId" => artifact_id = Some(text_buf.clone()),
                        "version" => version = Some(text_buf.clone()),
                        "packaging" => packaging = Some(text_buf.clone()),
                        "name" => name = Some(text_buf.clone()),
                        "description" => description = Some(text_buf.clone()),
                        "url" => url = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                if let Some(ref mut license) = current_license {
                    match ctx.as_str() {
                        "project>licenses>license>name" => license.name = text_buf.clone(),
                        "project>licenses>license>url" => license.url = text_buf.clone(),
                        "project>licenses>license" => {
                            if let Some(license) = current_license.take() {
                                licenses.push(license);
                            }
                        }
                        _ => {}
                    }
                }

                if let Some(ref mut developer) = current_developer {
                    match ctx.as_str() {
                        "project>developers>developer>id" => developer.id = text_buf.clone(),
                        "project>developers>developer>name" => {
                            developer.name = Some(text_buf.clone())
                        }
                        "project>developers>developer>email" => {
                            developer.email = Some(text_buf.clone())
                        }
                        "project>developers>developer>url" => {
                            developer.url = Some(text_buf.clone())
                        }
                        "project>developers>developer" => {
                            if let Some(developer) = current_developer.take() {
                                developers.push(developer);
                            }
                        }
                        _ => {}
                    }
                }

                if let Some(ref mut s) = scm {
                    match ctx.as_str() {
                        "project>scm>url" => s.url = Some(text_buf.clone()),
                        "project>scm>connection" => s.connection = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                if let Some(ref mut dependency) = current_dependency {
                    match ctx.as_str() {
                        "project>dependencies>dependency>groupId" => {
                            dependency.group_id = text_buf.clone()
                        }
                        "project>dependencies>dependency>artifactId" => {
                            dependency.artifact_id = text_buf.clone()
                        }
                        "project>dependencies>dependency>version" => {
                            dependency.version = text_buf.clone()
                        }
                        "project>dependencies>dependency>scope" => {
                            dependency.scope = Some(text_buf.clone())
                        }
                        "project>dependencies>dependency>optional" => {
                            dependency.optional = text_buf.trim() == "true"
                        }
                        "project>dependencies>dependency" => {
                            if let Some(dependency) = current_dependency.take() {
                                dependencies.push(dependency);
                            }
                        }
                        _ => {}
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(KpubError::Generic {
                    message: format!("Failed to parse POM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    let (Some(group_id), Some(artifact_id), Some(version)) = (group_id, artifact_id, version)
    else {
        return Err(KpubError::Generic {
            message: "POM is missing groupId, artifactId, or version".into(),
        }
        .into());
    };

    Ok(PomDocument {
        coordinates: MavenCoordinates::new(group_id, artifact_id, version),
        packaging,
        name,
        description,
        url,
        licenses,
        developers,
        scm,
        dependencies,
    })
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PomDocument {
        PomDocument {
            coordinates: MavenCoordinates::new("com.example", "demo-jvm", "1.0.0"),
            packaging: None,
            name: Some("demo-jvm".into()),
            description: Some("Demo library".into()),
            url: Some("https://github.com/octocat/demo".into()),
            licenses: vec![License {
                name: "Apache-2.0".into(),
                url: "https://www.apache.org/licenses/LICENSE-2.0".into(),
            }],
            developers: vec![Developer {
                id: "octocat".into(),
                name: Some("octocat".into()),
                email: None,
                url: None,
            }],
            scm: Some(Scm {
                url: Some("https://github.com/octocat/demo".into()),
                connection: Some("scm:git:git://github.com/octocat/demo.git".into()),
            }),
            dependencies: vec![PomDependency {
                group_id: "org.jetbrains.kotlinx".into(),
                artifact_id: "kotlinx-coroutines-core".into(),
                version: "1.8.0".into(),
                scope: None,
                optional: false,
            }],
        }
    }

    #[test]
    fn write_parse_round_trip() {
        let doc = sample();
        let xml = doc.to_xml().unwrap();
        let parsed = parse_pom(&xml).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn writes_the_standard_header() {
        let xml = sample().to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns=\"http://maven.apache.org/POM/4.0.0\""));
        assert!(xml.contains("<modelVersion>4.0.0</modelVersion>"));
    }

    #[test]
    fn omits_empty_sections() {
        let doc = PomDocument::new(MavenCoordinates::new("g", "a", "1"));
        let xml = doc.to_xml().unwrap();
        assert!(!xml.contains("<licenses>"));
        assert!(!xml.contains("<dependencies>"));
        assert!(!xml.contains("<packaging>"));
    }

    #[test]
    fn escapes_special_characters() {
        let mut doc = PomDocument::new(MavenCoordinates::new("g", "a", "1"));
        doc.description = Some("uses <generics> & \"quotes\"".into());
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("&lt;generics&gt;"));
        assert!(xml.contains("&amp;"));
        let parsed = parse_pom(&xml).unwrap();
        assert_eq!(
            parsed.description.as_deref(),
            Some("uses <generics> & \"quotes\"")
        );
    }

    #[test]
    fn proxied_document_takes_root_identity() {
        let doc = sample();
        let root = MavenCoordinates::new("com.example", "demo", "1.0.0");
        let proxied = doc.proxied_to(&root);
        assert_eq!(proxied.coordinates, root);
        assert_eq!(proxied.name.as_deref(), Some("demo"));
        // Body survives untouched.
        assert_eq!(proxied.dependencies, doc.dependencies);
        assert_eq!(proxied.licenses, doc.licenses);
        assert_eq!(proxied.scm, doc.scm);
        // Original is undisturbed.
        assert_eq!(doc.coordinates.artifact_id, "demo-jvm");
    }

    #[test]
    fn proxied_document_keeps_custom_names() {
        let mut doc = sample();
        doc.name = Some("Demo Library".into());
        let root = MavenCoordinates::new("com.example", "demo", "1.0.0");
        assert_eq!(doc.proxied_to(&root).name.as_deref(), Some("Demo Library"));
    }

    #[test]
    fn dependency_proxy_is_pom_packaged_with_one_edge() {
        let doc = sample();
        let root = MavenCoordinates::new("com.example", "demo", "1.0.0");
        let proxy = doc.dependency_proxy(&root);
        assert_eq!(proxy.packaging.as_deref(), Some("pom"));
        assert_eq!(proxy.dependencies.len(), 1);
        let edge = &proxy.dependencies[0];
        assert_eq!(edge.artifact_id, "demo-jvm");
        assert_eq!(edge.scope.as_deref(), Some("compile"));
        assert_eq!(edge.version, "1.0.0");
    }
}
