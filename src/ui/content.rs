//! Static profile copy shown by the About, Skills and Contact panels.

pub struct Profile {
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static [&'static str],
}

pub const PROFILE: Profile = Profile {
    name: "Alex Rivera",
    role: "Creative Technologist",
    bio: &[
        "I build interactive experiences where graphics, sound and machine learning meet.",
        "This portfolio is one of them: drive around, bump into things, and pull over at a \
         glowing pad to read more.",
        "Outside of work I tinker with synthesizers, procedural worlds and tiny game engines.",
    ],
};

pub struct SkillGroup {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

pub const SKILLS: &[SkillGroup] = &[
    SkillGroup {
        title: "Languages",
        items: &["Rust", "TypeScript", "Python", "GLSL / WGSL"],
    },
    SkillGroup {
        title: "Graphics & Games",
        items: &["Bevy", "three.js", "Real-time physics", "Procedural audio"],
    },
    SkillGroup {
        title: "AI & Media",
        items: &["Generative video", "Image editing pipelines", "Prompt design"],
    },
    SkillGroup {
        title: "Tooling",
        items: &["Git", "CI pipelines", "Profiling", "Cross-platform builds"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactLink {
    pub label: &'static str,
    pub url: &'static str,
}

pub const CONTACT_LINKS: &[ContactLink] = &[
    ContactLink {
        label: "Email",
        url: "mailto:hello@alexrivera.dev",
    },
    ContactLink {
        label: "GitHub",
        url: "https://github.com/alexrivera",
    },
    ContactLink {
        label: "LinkedIn",
        url: "https://www.linkedin.com/in/alexrivera",
    },
];

pub const CONTACT_BLURB: &str =
    "Open to collaborations, freelance work and interesting conversations.";
