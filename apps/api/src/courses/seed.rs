//! Built-in starter courses, loaded with `learnpath-api seed`.

use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct SeedCourse {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub content: &'static str,
}

pub const SEED_COURSES: &[SeedCourse] = &[
    SeedCourse {
        title: "Introduction to Python Programming",
        description: "Learn the basics of Python, one of the most popular programming languages.",
        category: "Programming",
        content: r#"
# Introduction to Python

Python is a high-level, interpreted programming language known for its readability and versatility.

## Key Concepts
1. **Variables**: Containers for storing data values.
2. **Data Types**: Integers, Floats, Strings, Booleans.
3. **Control Flow**: if/else statements, for/while loops.
4. **Functions**: Reusable blocks of code.

## Example Code
```python
def greet(name):
    return f"Hello, {name}!"

print(greet("World"))
```

Python is widely used in Web Development, Data Science, AI, and Automation.
"#,
    },
    SeedCourse {
        title: "Web Development Fundamentals",
        description: "Master HTML, CSS, and JavaScript to build modern websites.",
        category: "Web Dev",
        content: r#"
# Web Development Fundamentals

Web development is the work involved in developing a website for the Internet.

## Core Technologies
1. **HTML (HyperText Markup Language)**: The structure of the web page.
2. **CSS (Cascading Style Sheets)**: The styling and layout.
3. **JavaScript**: The interactivity and logic.

## The DOM
The Document Object Model (DOM) is a programming interface for web documents. It represents the page so that programs can change the document structure, style, and content.
"#,
    },
    SeedCourse {
        title: "Machine Learning Basics",
        description: "Understand the core concepts of ML and how machines learn from data.",
        category: "AI/ML",
        content: r#"
# Machine Learning Basics

Machine Learning (ML) is a subset of artificial intelligence (AI) that focuses on building systems that learn from data.

## Types of Learning
1. **Supervised Learning**: Learning from labeled data (e.g., Spam detection).
2. **Unsupervised Learning**: Finding patterns in unlabeled data (e.g., Customer segmentation).
3. **Reinforcement Learning**: Learning through trial and error (e.g., Game playing AI).

## Common Algorithms
- Linear Regression
- Decision Trees
- Neural Networks
"#,
    },
];

/// Replaces every course with the seed set in one transaction.
pub async fn import_courses(pool: &PgPool) -> Result<usize> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM courses").execute(&mut *tx).await?;
    info!("Removed {} existing courses", removed.rows_affected());

    let now = Utc::now();
    for course in SEED_COURSES {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, content, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(course.title)
        .bind(course.description)
        .bind(course.content.trim())
        .bind(course.category)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Imported {} seed courses", SEED_COURSES.len());
    Ok(SEED_COURSES.len())
}
