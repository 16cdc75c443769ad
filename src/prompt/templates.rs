//! Built-in stage prompt templates (Handlebars).

pub const EXTRACT_SYSTEM: &str = "extract_system";
pub const EXTRACT_USER: &str = "extract_user";
pub const COMPOSE_SYSTEM: &str = "compose_system";
pub const COMPOSE_USER: &str = "compose_user";
pub const REFERENCE_SYSTEM: &str = "reference_system";
pub const CRITIQUE_USER: &str = "critique_user";
pub const REVISE_USER: &str = "revise_user";

/// (name, template) pairs registered by `PromptRenderer::new`
pub const BUILTIN: [(&str, &str); 7] = [
    (EXTRACT_SYSTEM, EXTRACT_SYSTEM_TEMPLATE),
    (EXTRACT_USER, EXTRACT_USER_TEMPLATE),
    (COMPOSE_SYSTEM, COMPOSE_SYSTEM_TEMPLATE),
    (COMPOSE_USER, COMPOSE_USER_TEMPLATE),
    (REFERENCE_SYSTEM, REFERENCE_SYSTEM_TEMPLATE),
    (CRITIQUE_USER, CRITIQUE_USER_TEMPLATE),
    (REVISE_USER, REVISE_USER_TEMPLATE),
];

const EXTRACT_SYSTEM_TEMPLATE: &str = "{{description}}";

const EXTRACT_USER_TEMPLATE: &str = "Extract a list of the key points made or facts stated in the following document.
If the document does not contain enough information to state any facts, report insufficient information instead of guessing.

<document>
{{content}}
</document>";

const COMPOSE_SYSTEM_TEMPLATE: &str = "{{description}}
{{#each voice}}{{this}}
{{/each}}
When given a set of facts, write a tweet about them. Make it relevant and specific to the facts at hand.
{{#if has_examples}}
Pay attention to the earlier requests and replies in this conversation. These are good examples. Write the new tweet in the same style.
{{/if}}";

const COMPOSE_USER_TEMPLATE: &str = "Write a tweet summarizing the following facts. {{max_words}} words or less:
{{#each facts}}- {{this}}
{{/each}}";

const REFERENCE_SYSTEM_TEMPLATE: &str = "You are a helpful assistant. Here are past examples of tweets from {{name}}:

{{#each references}}<example>
{{this}}
</example>

{{/each}}";

const CRITIQUE_USER_TEMPLATE: &str = "Does the following tweet sound like {{name}}? If it does not, explain in one or two sentences what should change so that it does.

Tweet: {{tweet}}";

const REVISE_USER_TEMPLATE: &str = "Revise the following tweet to be more in the style of {{name}}'s past tweets.

What to change: {{feedback}}

Tweet: {{tweet}}

Respond with the revised tweet only.";
