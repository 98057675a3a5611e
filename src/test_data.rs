#[cfg(test)]
pub const POST_DATA: &str = r#"---
title: "What I learned: 20+ years of software development"
description: How to be a great software engineer?
date: 2022-04-02T12:05:00Z
dateUpdated: 2022-05-01
author: Jane Doe
tags:
  - career
  - software
image: /img/learned.webp
---

# What I learned: 20+ years of software development

Someone asked me this question today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. You solved many hard problems.
"#;

#[cfg(test)]
pub const POST_DATA_SINGLE_TAG: &str = r#"---
title: 'Quoted ''title'' with: colon'
description: "A post with one tag"
date: "2023-11-20"
tags: rust
category: programming
---
Body text.
"#;

#[cfg(test)]
pub const POST_DATA_NO_TITLE: &str = r#"---
description: Nobody named me
date: 2023-01-01
---
Body
"#;
