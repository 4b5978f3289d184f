//! Deterministic reviewer used when no hosted model is configured.
//!
//! Scores the resume against fixed domain keyword dictionaries, runs seven
//! evidence detectors, checks the calendar, and writes a review in the same
//! heading convention a hosted model is asked to follow. Every list is padded
//! to [`MIN_ITEMS`] from a per-list fallback pool.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::dates::{analyze_dates, DateReport};
use crate::analysis::sections::{ParsedAnalysis, BULLET};
use crate::analysis::turkish::fold;

/// Minimum bullets in each of strengths, weaknesses and additions.
pub const MIN_ITEMS: usize = 6;

/// Domains mentioned in the summary.
pub const TOP_DOMAINS: usize = 2;

/// Date findings quoted per weakness bullet.
const MAX_QUOTED_DATES: usize = 3;

/// Domain keyword dictionaries. Declaration order breaks score ties.
pub const DOMAINS: &[(&str, &[&str])] = &[
    (
        "software",
        &[
            "javascript", "typescript", "react", "java", "python", "node", "c#", "dotnet", "php",
            "go", "docker", "kubernetes", "aws", "azure", "gcp", "sql", "nosql",
        ],
    ),
    (
        "data",
        &[
            "data", "sql", "excel", "tableau", "power bi", "pandas", "numpy", "statistics",
            "analytics", "model", "ml", "ai", "spark", "hadoop", "python", "r",
        ],
    ),
    (
        "product",
        &[
            "product", "roadmap", "backlog", "discovery", "requirements", "stakeholder", "mvp",
            "kpi", "prio", "go to market",
        ],
    ),
    (
        "design",
        &[
            "ux", "ui", "figma", "sketch", "wireframe", "prototype", "usability", "a/b", "visual",
            "design system",
        ],
    ),
    (
        "marketing",
        &[
            "seo", "sem", "google ads", "meta ads", "campaign", "crm", "hubspot", "mailchimp",
            "content", "brand", "roi", "kpi", "cac", "ltv", "ga4",
        ],
    ),
    (
        "sales",
        &[
            "sales", "pipeline", "crm", "leads", "quota", "negotiation", "closing", "prospecting",
            "b2b", "b2c", "salesforce",
        ],
    ),
    (
        "hr",
        &[
            "recruit", "talent", "onboarding", "payroll", "benefits", "people ops", "interview",
            "hris",
        ],
    ),
    (
        "finance",
        &[
            "finance", "accounting", "budget", "forecast", "p&l", "cash flow", "gaap", "ifrs",
            "audit", "tax", "sap", "oracle",
        ],
    ),
    (
        "operations",
        &[
            "operations", "supply", "logistics", "inventory", "warehouse", "lean", "six sigma",
            "process", "sla",
        ],
    ),
    (
        "education",
        &[
            "teacher", "instructor", "curriculum", "lesson", "student", "pedagogy", "assessment",
            "research", "publication",
        ],
    ),
    (
        "healthcare",
        &[
            "clinic", "patient", "hospital", "nurse", "physician", "medical", "emr", "ehr",
            "hipaa", "treatment", "care",
        ],
    ),
    (
        "legal",
        &[
            "law", "legal", "contract", "compliance", "case", "litigation", "ip", "gdpr",
            "privacy",
        ],
    ),
    (
        "customer",
        &[
            "support", "customer success", "ticket", "sla", "csat", "nps", "zendesk", "intercom",
        ],
    ),
    (
        "project",
        &[
            "project manager", "program", "pmo", "timeline", "scope", "budget", "risk", "gantt",
            "agile", "waterfall",
        ],
    ),
];

/// Generic resume-quality indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Metrics,
    Projects,
    Leadership,
    Awards,
    Education,
    Certifications,
    Languages,
}

/// Detector patterns, matched against Turkish-folded lower-case text.
const SIGNAL_PATTERNS: &[(Signal, &str)] = &[
    (
        Signal::Metrics,
        r"\d+[ \t]?%|%[ \t]?\d+|\b\d+\s*(?:ay|yil|year|years|month|months)\b|\b\d+(?:[.,]\d+)?\s*(?:k|m|mn|milyon|million|bin)\b|\b(?:gelir|revenue|cost|maliyet)\b|[$€£₺][ \t]?\d|\b\d+[ \t]?(?:tl|usd|eur)\b|\b\d+x\b",
    ),
    (
        Signal::Projects,
        r"project|proje|case study|vaka|portfolio|portfoy|github",
    ),
    (
        Signal::Leadership,
        r"lead|lider|managed|manager|mentor|directed|yonet|koordine",
    ),
    (
        Signal::Awards,
        r"award|odul|basari|recognition|publication|yayin|patent",
    ),
    (
        Signal::Education,
        r"lisans|bsc|msc|phd|doktora|universite|university|degree|master|bachelor|mezun",
    ),
    (
        Signal::Certifications,
        r"certificate|certification|certified|sertifika|pmp|cfa|cpa|scrum|psm|ga4|ielts|toefl",
    ),
    (
        Signal::Languages,
        r"english|ingilizce|turkish|turkce|german|almanca|french|fransizca|spanish|ispanyolca|italian|italyanca|arabic|arapca",
    ),
];

static SIGNAL_RULES: Lazy<Vec<(Signal, Regex)>> = Lazy::new(|| {
    SIGNAL_PATTERNS
        .iter()
        .map(|(signal, pattern)| {
            let rule = Regex::new(&format!("(?i){pattern}")).expect("valid signal regex");
            (*signal, rule)
        })
        .collect()
});

const STRENGTH_POOL: &[&str] = &[
    "Net, kısa ve sonuç odaklı anlatım.",
    "İlgili araç ve yöntemlere aşinalık.",
    "Takım çalışması ve iletişim vurgusu.",
    "Sorumluluk almaya ve öğrenmeye açıklık.",
    "Proaktif problem çözme yaklaşımı.",
    "Temiz ve tutarlı biçimlendirme.",
];

const WEAKNESS_POOL: &[&str] = &[
    "Ölçülebilir sonuçları rakamlarla vurgulayın.",
    "Rol ve kapsamı her projede netleştirin.",
    "Kullanılan araç/süreçleri sürüm ve kapsamla detaylandırın.",
    "Link ve referansları (portföy, GitHub, yayın) ekleyin.",
    "Eğitim/sertifika/ruhsat bilgilerini düzenleyin.",
    "Yazım ve biçim tutarlılığını gözden geçirin.",
];

const ADDITION_POOL: &[&str] = &[
    "Öne çıkan 2-3 projeyi kısa vaka şeklinde ekleyin.",
    "Başarıları yüzde/süre/adet/gelir-maliyet ile nicelleştirin.",
    "Anahtar kelimeleri hedef role uygun olacak şekilde güncelleyin.",
    "Yetkinlikleri güncel versiyon/araç isimleriyle netleştirin.",
    "Sertifika/ödül/yayın gibi ayırt edicileri ekleyin.",
    "ATS uyumlu, sade ve taranabilir bir düzen kullanın.",
];

const ATS_ADVICE: &str =
    "ATS uyumu için sade biçim, net başlıklar ve uygun anahtar kelimeler kullanın.";

/// Keyword hits per domain, in dictionary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainScores(Vec<(&'static str, u32)>);

impl DomainScores {
    /// Counts, per domain, how many of its keywords occur in `lowered`.
    pub fn compute(lowered: &str) -> Self {
        let scores = DOMAINS
            .iter()
            .map(|(domain, keywords)| {
                let hits = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
                (*domain, hits as u32)
            })
            .collect();
        Self(scores)
    }

    #[cfg(test)]
    fn get(&self, domain: &str) -> u32 {
        self.0
            .iter()
            .find(|(name, _)| *name == domain)
            .map_or(0, |(_, score)| *score)
    }

    /// Up to `n` domains with a positive score, highest first.
    pub fn top(&self, n: usize) -> Vec<&'static str> {
        let mut ranked: Vec<_> = self.0.iter().filter(|(_, score)| *score > 0).collect();
        // Stable sort keeps dictionary order for equal scores.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(name, _)| *name).collect()
    }
}

/// Result of the seven evidence detectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub metrics: bool,
    pub projects: bool,
    pub leadership: bool,
    pub awards: bool,
    pub education: bool,
    pub certifications: bool,
    pub languages: bool,
}

impl Evidence {
    pub fn detect(text: &str) -> Self {
        let folded = fold(text);
        let mut evidence = Self::default();
        for (signal, rule) in SIGNAL_RULES.iter() {
            if rule.is_match(&folded) {
                *evidence.slot(*signal) = true;
            }
        }
        evidence
    }

    pub fn has(&self, signal: Signal) -> bool {
        match signal {
            Signal::Metrics => self.metrics,
            Signal::Projects => self.projects,
            Signal::Leadership => self.leadership,
            Signal::Awards => self.awards,
            Signal::Education => self.education,
            Signal::Certifications => self.certifications,
            Signal::Languages => self.languages,
        }
    }

    fn slot(&mut self, signal: Signal) -> &mut bool {
        match signal {
            Signal::Metrics => &mut self.metrics,
            Signal::Projects => &mut self.projects,
            Signal::Leadership => &mut self.leadership,
            Signal::Awards => &mut self.awards,
            Signal::Education => &mut self.education,
            Signal::Certifications => &mut self.certifications,
            Signal::Languages => &mut self.languages,
        }
    }
}

/// Everything the analyzer learned about one resume.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub domain_scores: DomainScores,
    pub top_domains: Vec<&'static str>,
    pub evidence: Evidence,
    pub dates: DateReport,
}

pub fn assess(text: &str, evaluation_date: NaiveDate) -> Assessment {
    let domain_scores = DomainScores::compute(&text.to_lowercase());
    let top_domains = domain_scores.top(TOP_DOMAINS);
    Assessment {
        domain_scores,
        top_domains,
        evidence: Evidence::detect(text),
        dates: analyze_dates(text, evaluation_date),
    }
}

fn strength_copy(signal: Signal) -> &'static str {
    match signal {
        Signal::Metrics => "Nicel etki/sonuç ifadeleri bulunuyor (%, süre, adet, gelir/maliyet).",
        Signal::Projects => "Proje/portföy veya vaka çalışması izleri var.",
        Signal::Leadership => "Liderlik/koordinasyon veya mentorluk deneyimi sinyali var.",
        Signal::Awards => "Ödül, başarı veya yayın gibi ayırt edici unsurlar mevcut.",
        Signal::Education => "Eğitim geçmişi veya dereceler belirtilmiş.",
        Signal::Certifications => "İlgili sertifikalar/ruhsatlar yer alıyor.",
        Signal::Languages => "Yabancı dil bilgisi belirtilmiş.",
    }
}

fn weakness_copy(signal: Signal) -> &'static str {
    match signal {
        Signal::Metrics => "Ölçülebilir sonuçlar zayıf; yüzde/süre/adet/gelir-maliyet ile güçlendirin.",
        Signal::Projects => "Somut proje/çalışma örnekleri veya portföy bağlantıları eksik.",
        Signal::Leadership => "Liderlik/koordinasyon veya ekip katkısı örnekleri sınırlı.",
        Signal::Awards => "Ödül, başarı veya yayın gibi ayırt ediciler yer almıyor.",
        Signal::Education => "Eğitim/sertifika/ruhsat bilgilerinin kapsamı net değil.",
        Signal::Certifications => "İlgili sertifikalar/ruhsatlar belirtilmemiş.",
        Signal::Languages => "Yabancı dil yeterliliği belirtilmemiş.",
    }
}

/// Remediation for a missing signal, in the order additions are listed.
const ADDITIONS: &[(Signal, &str)] = &[
    (Signal::Metrics, "Başarıları nicelleştirin: % değişim, süre, adet, gelir/maliyet."),
    (
        Signal::Projects,
        "Portföy/vaka çalışması bağlantıları ekleyin; kapsam, rol, araçlar ve etkiyi 1-2 satırda özetleyin.",
    ),
    (
        Signal::Certifications,
        "Alanla ilgili sertifika/ruhsatları belirtin (ör. PMP, CPA, CFA, GA4).",
    ),
    (Signal::Leadership, "Liderlik/mentorluk ve ekip içi işbirliği örnekleri ekleyin."),
    (Signal::Languages, "Yabancı dil düzeyini (CEFR/puan) ve kullanım bağlamını ekleyin."),
];

const SIGNALS: [Signal; 7] = [
    Signal::Metrics,
    Signal::Projects,
    Signal::Leadership,
    Signal::Awards,
    Signal::Education,
    Signal::Certifications,
    Signal::Languages,
];

/// Returns `items` extended from `pool`, in pool order, until `minimum` is
/// reached or the pool runs out. Never shortens `items`; pool entries already
/// present are skipped.
pub fn pad_to(items: &[String], pool: &[&str], minimum: usize) -> Vec<String> {
    let mut padded = items.to_vec();
    for candidate in pool {
        if padded.len() >= minimum {
            break;
        }
        if !padded.iter().any(|item| item == candidate) {
            padded.push(candidate.to_string());
        }
    }
    padded
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the review from an assessment. `role` only shapes the summary.
pub fn compose(assessment: &Assessment, role: Option<&str>) -> ParsedAnalysis {
    let evidence = &assessment.evidence;
    let domains = assessment.top_domains.join(", ");

    let mut summary = String::new();
    if let Some(role) = role.map(squash_whitespace).filter(|r| !r.is_empty()) {
        summary.push_str(&format!("Hedef rol: {role}. "));
    }
    if !domains.is_empty() {
        summary.push_str(&format!("Olası alan(lar): {domains}. "));
    }
    summary.push_str(
        "Metin; rol/alan yetkinlikleri, nicel etki ve genel yetkinlikler açısından kurallı olarak tarandı. \
         Aşağıdaki maddeler yaklaşık değerlendirmedir.",
    );

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    if domains.is_empty() {
        weaknesses.push("Rol/alan odağı net değil; anahtar kelimeler zayıf.".to_string());
    } else {
        strengths.push(format!(
            "Alan sinyalleri: {domains} alan(lar)ına dair anahtar kelimeler mevcut."
        ));
    }
    for signal in SIGNALS {
        if evidence.has(signal) {
            strengths.push(strength_copy(signal).to_string());
        } else {
            weaknesses.push(weakness_copy(signal).to_string());
        }
    }

    let dates = &assessment.dates;
    if !dates.future_ranges.is_empty() {
        weaknesses.push(format!(
            "Gelecekte görünen tarih aralıkları: {}. Geçmişte tamamlandıysa güncelleyin.",
            quote(&dates.future_ranges)
        ));
    }
    if !dates.malformed.is_empty() {
        weaknesses.push(format!(
            "Anlaşılamayan/bozuk tarih ifadeleri: {}. Biçimi netleştirin (örn. 07/2023 - 08/2023).",
            quote(&dates.malformed)
        ));
    }

    let mut additions: Vec<String> = ADDITIONS
        .iter()
        .filter(|(signal, _)| !evidence.has(*signal))
        .map(|(_, advice)| advice.to_string())
        .collect();
    additions.push(ATS_ADVICE.to_string());

    ParsedAnalysis {
        summary,
        strengths: bullets(pad_to(&strengths, STRENGTH_POOL, MIN_ITEMS)),
        weaknesses: bullets(pad_to(&weaknesses, WEAKNESS_POOL, MIN_ITEMS)),
        additions: bullets(pad_to(&additions, ADDITION_POOL, MIN_ITEMS)),
    }
}

fn quote(findings: &[String]) -> String {
    findings
        .iter()
        .take(MAX_QUOTED_DATES)
        .map(|f| squash_whitespace(f))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn bullets(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|item| format!("{BULLET}{item}")).collect()
}

/// Reviews `text` without a hosted model and returns the review as text in
/// the four-heading convention.
pub fn mock_analyze(text: &str, role: Option<&str>, evaluation_date: NaiveDate) -> String {
    compose(&assess(text, evaluation_date), role).to_text()
}
