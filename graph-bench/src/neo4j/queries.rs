// Cypher statements issued by the Neo4j adapter

pub const VERTEX_LABEL: &str = "Vertex";
pub const LINK_TYPE: &str = "LINKED";

pub const CLEAR_GRAPH: &str = "MATCH (n) DETACH DELETE n";

pub const MERGE_VERTEX: &str = "MERGE (v:Vertex {name: $name})";

/// Both directions are merged so the stored graph behaves as undirected.
pub const MERGE_LINK: &str = "MATCH (a:Vertex {name: $v1}) \
     MATCH (b:Vertex {name: $v2}) \
     MERGE (a)-[:LINKED]->(b) \
     MERGE (b)-[:LINKED]->(a)";

/// One row, always. `degrees` is null when no path exists; the two flags
/// tell a missing endpoint apart from a disconnected pair.
pub const SHORTEST_PATH: &str = "OPTIONAL MATCH (a:Vertex {name: $v1}) \
     OPTIONAL MATCH (b:Vertex {name: $v2}) \
     OPTIONAL MATCH p = shortestPath((a)-[:LINKED*]-(b)) \
     RETURN a IS NOT NULL AS has_v1, b IS NOT NULL AS has_v2, length(p) AS degrees";

/// Used instead of `SHORTEST_PATH` when both endpoints are the same vertex,
/// since `shortestPath` rejects equal start and end nodes.
pub const VERTEX_EXISTS: &str =
    "OPTIONAL MATCH (a:Vertex {name: $v1}) RETURN a IS NOT NULL AS has_v1";

pub const CREATE_NAME_CONSTRAINT: &str =
    "CREATE CONSTRAINT vertex_name_unique IF NOT EXISTS FOR (v:Vertex) REQUIRE v.name IS UNIQUE";

pub const SHOW_INDEXES: &str = "SHOW INDEXES";
