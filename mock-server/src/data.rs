//! Seeded resources served by the fixture server.
//!
//! The dataset is built once and never changes: writes are echoed back to the
//! caller but not stored, the same way the public fixture service behaves.

use serde::{Deserialize, Serialize};

pub const USER_COUNT: u64 = 10;
pub const POSTS_PER_USER: u64 = 10;
pub const COMMENTS_PER_POST: u64 = 5;

const PEOPLE: [(&str, &str); USER_COUNT as usize] = [
    ("Leanne", "Graham"),
    ("Ervin", "Howell"),
    ("Clementine", "Bauch"),
    ("Patricia", "Lebsack"),
    ("Chelsey", "Dietrich"),
    ("Dennis", "Schulist"),
    ("Kurtis", "Weissnat"),
    ("Nicholas", "Runolfsdottir"),
    ("Glenna", "Reichert"),
    ("Clementina", "DuBuque"),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: u64,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// The three collections the server exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Users,
    Posts,
    Comments,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
            Collection::Comments => "comments",
        }
    }
}

#[derive(Debug)]
pub struct Dataset {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

impl Dataset {
    pub fn seed() -> Self {
        let users = (1..=USER_COUNT).map(seed_user).collect();
        let posts = (1..=USER_COUNT * POSTS_PER_USER).map(seed_post).collect();
        let comments = (1..=USER_COUNT * POSTS_PER_USER * COMMENTS_PER_POST)
            .map(seed_comment)
            .collect();
        Self {
            users,
            posts,
            comments,
        }
    }

    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Users => self.users.len(),
            Collection::Posts => self.posts.len(),
            Collection::Comments => self.comments.len(),
        }
    }

    pub fn contains(&self, collection: Collection, id: u64) -> bool {
        match collection {
            Collection::Users => self.users.iter().any(|u| u.id == id),
            Collection::Posts => self.posts.iter().any(|p| p.id == id),
            Collection::Comments => self.comments.iter().any(|c| c.id == id),
        }
    }

    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn comment(&self, id: u64) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn comments_for_post(&self, post_id: u64) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }
}

fn seed_user(id: u64) -> User {
    let (first, last) = PEOPLE[(id - 1) as usize % PEOPLE.len()];
    let username = format!("{}{}", &first[..1], last.to_lowercase());
    User {
        id,
        name: format!("{first} {last}"),
        email: format!("{}@example.com", first.to_lowercase()),
        address: Address {
            street: format!("{} Main Street", 100 + id),
            suite: format!("Apt. {}", 500 + id),
            city: "Gwenborough".to_string(),
            zipcode: format!("{:05}", 92000 + id),
            geo: Geo {
                lat: format!("-37.{:04}", 3159 + id),
                lng: format!("81.{:04}", 1496 + id),
            },
        },
        phone: format!("1-770-736-{:04}", 8000 + id),
        website: format!("{}.example.org", last.to_lowercase()),
        company: Company {
            name: format!("{last} Group"),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
            bs: "harness real-time e-markets".to_string(),
        },
        username,
    }
}

fn seed_post(id: u64) -> Post {
    let user_id = (id - 1) / POSTS_PER_USER + 1;
    Post {
        user_id,
        id,
        title: format!("post {id} by user {user_id}"),
        body: format!("body of post {id}\nwritten by user {user_id}"),
    }
}

fn seed_comment(id: u64) -> Comment {
    let post_id = (id - 1) / COMMENTS_PER_POST + 1;
    Comment {
        post_id,
        id,
        name: format!("comment {id} on post {post_id}"),
        email: format!("reader{id}@example.net"),
        body: format!("body of comment {id}"),
    }
}
