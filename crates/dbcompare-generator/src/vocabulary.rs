//! Word lists the generator draws from.

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Barbara", "David", "Elizabeth", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Christopher", "Nancy", "Daniel", "Lisa",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Thompson", "White", "Harris",
];

pub const DOMAINS: &[&str] = &[
    "example.com", "test.com", "demo.com", "sample.org", "email.net", "mail.com", "inbox.io",
    "webmail.com", "contact.biz", "corp.com",
];

pub const DESCRIPTION_OPENERS: &[&str] = &[
    "Experienced professional with strong background in",
    "Dedicated team member focused on",
    "Results-driven individual specializing in",
    "Innovative thinker passionate about",
    "Strategic planner with expertise in",
    "Dynamic professional committed to",
    "Detail-oriented specialist in",
    "Accomplished expert with knowledge of",
];

pub const SKILLS: &[&str] = &[
    "project management", "data analysis", "software development", "customer service",
    "marketing strategy", "financial planning", "quality assurance", "business operations",
    "technical support", "product design", "team leadership", "process improvement",
];

pub const DESCRIPTION_CLOSERS: &[&str] = &[
    " and delivering exceptional results.",
    " with proven track record.",
    " and continuous improvement.",
    " to drive organizational success.",
    " and collaborative problem-solving.",
];
