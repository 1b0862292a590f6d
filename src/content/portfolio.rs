//! Portfolio data models (portfolio.json)
//!
//! One record per home-page section. Everything here is plain data handed
//! to the templates; the models carry no behavior beyond deserialization.

use serde::{Deserialize, Serialize};

/// The whole portfolio data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub hero: Hero,
    pub skills: Skills,
    pub experience: Experience,
    pub projects: Projects,
    pub contact: Contact,
}

/// Hero section: name, headline, intro, profile image, call-to-action links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub title: String,
    pub description: String,
    pub image: Image,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub primary: bool,
}

/// Skills section: categories of named items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skills {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    #[serde(default)]
    pub items: Vec<SkillItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillItem {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// Experience section: a timeline of jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub role: String,
    pub company: String,
    pub period: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Projects section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projects {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub link: Link,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// Contact section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub email: String,
    #[serde(default)]
    pub socials: Vec<Social>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Social {
    pub platform: String,
    pub href: String,
    #[serde(default)]
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portfolio() {
        let json = r##"{
            "hero": {
                "name": "Jane Doe",
                "title": "DevOps Engineer",
                "description": "I build pipelines.",
                "image": { "src": "/assets/me.png", "alt": "Jane" },
                "actions": [
                    { "label": "Contact", "href": "#contact", "primary": true },
                    { "label": "Resume", "href": "/assets/resume.pdf" }
                ]
            },
            "skills": {
                "title": "Skills",
                "categories": [
                    { "title": "Cloud", "items": [{ "name": "AWS" }, { "name": "GCP" }] }
                ]
            },
            "experience": {
                "title": "Experience",
                "jobs": [
                    {
                        "role": "SRE",
                        "company": "Acme",
                        "period": "2021 - Present",
                        "achievements": ["Cut deploy time in half"]
                    }
                ]
            },
            "projects": {
                "title": "Projects",
                "items": [
                    {
                        "title": "folio",
                        "description": "This site",
                        "tags": ["Rust"],
                        "link": { "label": "View on GitHub", "href": "https://github.com/x/folio" }
                    }
                ]
            },
            "contact": {
                "title": "Get in touch",
                "email": "jane@example.com",
                "socials": [{ "platform": "GitHub", "href": "https://github.com/x", "icon": "github" }]
            }
        }"##;

        let portfolio: Portfolio = serde_json::from_str(json).unwrap();
        assert_eq!(portfolio.hero.name, "Jane Doe");
        assert!(portfolio.hero.actions[0].primary);
        assert!(!portfolio.hero.actions[1].primary);
        assert_eq!(portfolio.skills.categories[0].items.len(), 2);
        assert_eq!(portfolio.experience.jobs[0].achievements.len(), 1);
        assert_eq!(portfolio.contact.socials[0].platform, "GitHub");
    }
}
