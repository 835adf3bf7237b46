use model::Route;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct RouteRow {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl RouteRow {
    pub fn to_model(self) -> Route {
        Route {
            id: self.id,
            group_id: self.group_id,
            name: self.name,
            description: self.description,
        }
    }
}
