//! Built-in taxonomy: four framework categories, the explicit vocabulary and
//! the implicit cue patterns.

use std::collections::BTreeMap;

use super::{CategorySpec, RegistrySpec};

const TECHNICAL_FOUNDATION: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "SQL",
    "Cloud",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "CI/CD",
    "Git",
];

const DATA_AND_AI: &[&str] = &[
    "Data Analysis",
    "Data Science",
    "Machine Learning",
    "Deep Learning",
    "Computer Vision",
    "NLP",
    "MLOps",
    "Pandas",
    "NumPy",
    "TensorFlow",
    "PyTorch",
    "XGBoost",
];

const PRODUCT_AND_DELIVERY: &[&str] = &[
    "Project Management",
    "Agile",
    "Scrum",
    "Kanban",
    "Product Management",
    "Stakeholder Management",
    "Roadmapping",
    "Testing",
    "QA",
    "DevOps",
    "Continuous Improvement",
    "Governance",
];

const LEADERSHIP_AND_IMPACT: &[&str] = &[
    "Leadership",
    "Mentorship",
    "Communication",
    "Strategic Planning",
    "Problem Solving",
    "Innovation",
    "Change Management",
];

const EXPLICIT: &[(&str, &[&str])] = &[
    ("Python", &["python"]),
    ("Java", &["java"]),
    ("JavaScript", &["javascript"]),
    ("TypeScript", &["typescript"]),
    ("C++", &["c++", "cpp"]),
    ("C#", &["c#", "csharp"]),
    ("SQL", &["sql"]),
    ("Cloud", &["cloud"]),
    ("AWS", &["aws", "amazon web services"]),
    ("Azure", &["azure"]),
    ("GCP", &["gcp", "google cloud"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("CI/CD", &["ci/cd", "continuous integration"]),
    ("Git", &["git"]),
    ("Data Analysis", &["data analysis"]),
    ("Data Science", &["data science"]),
    ("Machine Learning", &["machine learning"]),
    ("Deep Learning", &["deep learning"]),
    ("Computer Vision", &["computer vision"]),
    ("NLP", &["nlp", "natural language processing"]),
    ("MLOps", &["mlops"]),
    ("Pandas", &["pandas"]),
    ("NumPy", &["numpy"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch"]),
    ("XGBoost", &["xgboost"]),
    ("Project Management", &["project management"]),
    ("Agile", &["agile"]),
    ("Scrum", &["scrum"]),
    ("Kanban", &["kanban"]),
    ("Product Management", &["product management"]),
    ("Roadmapping", &["roadmapping"]),
    ("Testing", &["testing"]),
    ("QA", &["qa", "quality assurance"]),
    ("DevOps", &["devops"]),
    ("Leadership", &["leadership"]),
    ("Mentorship", &["mentorship", "mentoring"]),
    ("Communication", &["communication"]),
    ("Strategic Planning", &["strategic planning"]),
    ("Problem Solving", &["problem solving", "problem-solving"]),
    ("Innovation", &["innovation"]),
    ("Change Management", &["change management"]),
];

const IMPLICIT: &[(&str, &[&str])] = &[
    (
        "Leadership",
        &[r"\bled\b", r"\bmanaged\b", r"\bhead(ed)?\b", r"\bdirected\b"],
    ),
    ("Mentorship", &[r"\bmentored\b", r"\bcoached\b", r"\btrained\b"]),
    (
        "Stakeholder Management",
        &[r"\bstakeholders?\b", r"\baligned\b.*\bteam\b"],
    ),
    (
        "Communication",
        &[r"\bpresented\b", r"\bfacilitated\b", r"\bworkshops?\b"],
    ),
    (
        "Strategic Planning",
        &[r"\broadmap\b", r"\bstrategy\b", r"\bvision\b"],
    ),
    (
        "Problem Solving",
        &[r"\broot cause\b", r"\btroubleshoot(ed)?\b", r"\bdebugged\b"],
    ),
    (
        "Continuous Improvement",
        &[r"\bretrospectives?\b", r"\bcontinuous improvement\b", r"\bkaizen\b"],
    ),
    ("Governance", &[r"\baudit(ed)?\b", r"\bcompliance\b", r"\brisk\b"]),
    (
        "Innovation",
        &[r"\bprototype(d)?\b", r"\bexperiments?\b", r"\bhackathon\b"],
    ),
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(skill, values)| ((*skill).to_string(), owned(values)))
        .collect()
}

/// The taxonomy shipped with the binary.
#[must_use]
pub fn builtin_spec() -> RegistrySpec {
    let categories = [
        ("Technical Foundation", TECHNICAL_FOUNDATION),
        ("Data & AI", DATA_AND_AI),
        ("Product & Delivery", PRODUCT_AND_DELIVERY),
        ("Leadership & Impact", LEADERSHIP_AND_IMPACT),
    ]
    .into_iter()
    .map(|(name, skills)| CategorySpec {
        name: name.to_string(),
        skills: owned(skills),
    })
    .collect();

    RegistrySpec {
        categories,
        explicit: table(EXPLICIT),
        implicit: table(IMPLICIT),
    }
}
