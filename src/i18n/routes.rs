//! Static EN ↔ FR route tables.
//!
//! Two independent lookup structures exist: whole-page routes, and content
//! slugs of the resources section (articles use localized identifiers that
//! cannot be derived from each other). Both are built once from literal
//! tables and inverted at construction; an inversion that would lose an
//! entry is rejected.

use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// English listing prefix of the resources section.
pub const RESOURCES_PREFIX_EN: &str = "/resources/";

/// French listing prefix of the resources section.
pub const RESOURCES_PREFIX_FR: &str = "/fr/ressources/";

/// Whole-page equivalences, English → French.
pub const ROUTES: &[(&str, &str)] = &[
    // Core pages
    ("/", "/fr/"),
    ("/about-us/", "/fr/a-propos/"),
    ("/case-studies/", "/fr/realisations/"),
    ("/resources/", "/fr/ressources/"),
    ("/contact/", "/fr/contact/"),
    ("/services/", "/fr/services/"),
    // Services
    ("/services/web-design/", "/fr/services/conception-web/"),
    ("/services/managed-it/", "/fr/services/services-ti-geres/"),
    ("/services/cybersecurity/", "/fr/services/cybersecurite/"),
    ("/services/cloud-infrastructure/", "/fr/services/cloud-infrastructure/"),
    ("/services/it-consulting/", "/fr/services/conseil-ti-vcio/"),
    // Legal
    ("/legal/privacy/", "/fr/legal/confidentialite/"),
    ("/legal/terms/", "/fr/legal/conditions/"),
];

/// Resource article slugs, English → French.
pub const RESOURCE_SLUGS: &[(&str, &str)] = &[
    ("spf-dkim-dmarc-without-pain", "spf-dkim-dmarc-sans-douleur"),
    ("3-2-1-backup-strategy", "strategie-sauvegarde-3-2-1"),
    ("microsoft-365-security-checklist", "liste-controle-securite-microsoft-365"),
    ("phishing-awareness-training", "formation-sensibilisation-hameconnage"),
    ("password-manager-rollout", "deploiement-gestionnaire-mots-de-passe"),
    ("multi-factor-authentication-guide", "guide-authentification-multifacteur"),
    ("law-25-compliance-basics", "essentiels-conformite-loi-25"),
    ("cloud-migration-checklist", "liste-controle-migration-infonuagique"),
    ("incident-response-plan-template", "modele-plan-reponse-incidents"),
    ("choosing-a-managed-it-provider", "choisir-fournisseur-services-ti-geres"),
    ("core-web-vitals-explained", "signaux-web-essentiels-expliques"),
    ("endpoint-protection-basics", "bases-protection-postes-travail"),
    ("what-is-a-vcio", "quest-ce-quun-vcio"),
    ("network-segmentation-for-small-business", "segmentation-reseau-pme"),
    ("ransomware-recovery-playbook", "guide-reprise-apres-rancongiciel"),
    ("office-wifi-security", "securite-wifi-bureau"),
    ("it-budget-planning", "planification-budget-ti"),
    ("accessible-web-design", "conception-web-accessible"),
    ("patch-management-best-practices", "gestion-correctifs-bonnes-pratiques"),
    ("domain-and-dns-management", "gestion-domaines-et-dns"),
    ("secure-remote-work", "teletravail-securitaire"),
    ("website-migration-without-seo-loss", "migration-site-web-sans-perte-seo"),
];

/// Errors raised while building a bidirectional table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate key '{key}' in route table")]
    DuplicateKey { key: String },

    #[error("'{first}' and '{second}' both map to '{value}'")]
    ValueCollision {
        value: String,
        first: String,
        second: String,
    },
}

/// A one-to-one mapping with O(1) lookups in both directions.
#[derive(Debug, Clone, Default)]
pub struct BiMap {
    forward: HashMap<&'static str, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

impl BiMap {
    /// Build from `(left, right)` pairs, rejecting duplicates on either side.
    pub fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Result<Self, RouteTableError> {
        let mut map = BiMap::default();

        for &(left, right) in pairs {
            if map.forward.contains_key(left) {
                return Err(RouteTableError::DuplicateKey {
                    key: left.to_string(),
                });
            }
            if let Some(first) = map.reverse.get(right) {
                return Err(RouteTableError::ValueCollision {
                    value: right.to_string(),
                    first: first.to_string(),
                    second: left.to_string(),
                });
            }

            map.forward.insert(left, right);
            map.reverse.insert(right, left);
        }

        Ok(map)
    }

    /// Left → right lookup.
    pub fn get(&self, left: &str) -> Option<&'static str> {
        self.forward.get(left).copied()
    }

    /// Right → left lookup.
    pub fn get_reverse(&self, right: &str) -> Option<&'static str> {
        self.reverse.get(right).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over `(left, right)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.forward.iter().map(|(left, right)| (*left, *right))
    }
}

/// The route and resource-slug tables together with the listing prefixes
/// that scope the slug table.
#[derive(Debug, Clone)]
pub struct RouteTables {
    pub routes: BiMap,
    pub resource_slugs: BiMap,
    pub resources_prefix_en: &'static str,
    pub resources_prefix_fr: &'static str,
}

static TABLES: OnceLock<RouteTables> = OnceLock::new();

impl RouteTables {
    /// Build tables from literal pairs.
    ///
    /// Route entries must be normalized paths; slugs must be single segments.
    pub fn new(
        routes: &[(&'static str, &'static str)],
        resource_slugs: &[(&'static str, &'static str)],
    ) -> Result<Self, RouteTableError> {
        Ok(Self {
            routes: BiMap::from_pairs(routes)?,
            resource_slugs: BiMap::from_pairs(resource_slugs)?,
            resources_prefix_en: RESOURCES_PREFIX_EN,
            resources_prefix_fr: RESOURCES_PREFIX_FR,
        })
    }

    /// Get the site's tables, built on first access.
    ///
    /// # Panics
    /// Panics on first access if the literal tables violate the one-to-one
    /// invariant; a collision would otherwise silently drop a route.
    pub fn get() -> &'static RouteTables {
        TABLES.get_or_init(|| {
            RouteTables::new(ROUTES, RESOURCE_SLUGS)
                .unwrap_or_else(|e| panic!("Invalid built-in route table: {}", e))
        })
    }
}
