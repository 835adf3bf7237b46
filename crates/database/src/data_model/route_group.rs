use model::RouteGroup;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct RouteGroupRow {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

impl RouteGroupRow {
    pub fn to_model(self) -> RouteGroup {
        RouteGroup {
            id: self.id,
            key: self.key,
            name: self.name,
            description: self.description,
        }
    }
}
