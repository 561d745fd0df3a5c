use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

use super::model::{Client, CreateClientPayload, Motion, Still, UpdateClientPayload};
use crate::error::DomainError;
use crate::storage;

/// Fetch one client document. `NotFound` when no document exists.
pub async fn get_client(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
) -> Result<Client, DomainError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CLIENT".to_string()))
        .key("SK", AttributeValue::S(format!("CLIENT#{}", client_id)))
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("DynamoDB get_item error: {}", e)))?;

    result
        .item()
        .and_then(client_from_item)
        .ok_or_else(|| DomainError::not_found("client", client_id))
}

/// List every client document, for the admin dashboard.
pub async fn list_clients(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Client>, DomainError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("CLIENT".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("CLIENT#".to_string()))
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("DynamoDB query error: {}", e)))?;

    let mut clients: Vec<Client> = result.items().iter().filter_map(client_from_item).collect();
    clients.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(clients)
}

/// Create a client with empty motion and still sequences.
pub async fn create_client(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateClientPayload,
) -> Result<Client, DomainError> {
    if payload.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "client name must not be empty".to_string(),
        ));
    }

    let client_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("CLIENT".to_string()))
        .item("SK", AttributeValue::S(format!("CLIENT#{}", client_id)))
        .item("name", AttributeValue::S(payload.name.clone()))
        .item("image", AttributeValue::S(payload.image.clone()))
        .item("motions", AttributeValue::L(vec![]))
        .item("stills", AttributeValue::L(vec![]))
        .item("created_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("DynamoDB put_item error: {}", e)))?;

    Ok(Client {
        client_id,
        name: payload.name,
        image: payload.image,
        motions: vec![],
        stills: vec![],
        created_at: now,
    })
}

/// Patch name/logo on a client document.
pub async fn update_client(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    payload: UpdateClientPayload,
) -> Result<Client, DomainError> {
    // Existence check first so a missing client is a 404, not a blind write.
    get_client(client, table_name, client_id).await?;

    let mut update_expr = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values = HashMap::new();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "client name must not be empty".to_string(),
            ));
        }
        update_expr.push("#name = :name");
        expr_names.insert("#name".to_string(), "name".to_string());
        expr_values.insert(":name".to_string(), AttributeValue::S(name));
    }

    if let Some(image) = payload.image {
        update_expr.push("#image = :image");
        expr_names.insert("#image".to_string(), "image".to_string());
        expr_values.insert(":image".to_string(), AttributeValue::S(image));
    }

    if !update_expr.is_empty() {
        let update_expression = format!("SET {}", update_expr.join(", "));

        let mut builder = client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S("CLIENT".to_string()))
            .key("SK", AttributeValue::S(format!("CLIENT#{}", client_id)))
            .update_expression(update_expression);

        for (k, v) in expr_names {
            builder = builder.expression_attribute_names(k, v);
        }
        for (k, v) in expr_values {
            builder = builder.expression_attribute_values(k, v);
        }

        builder
            .send()
            .await
            .map_err(|e| DomainError::RemoteCall(format!("DynamoDB update_item error: {}", e)))?;
    }

    get_client(client, table_name, client_id).await
}

/// Delete a client document along with every managed blob it references.
pub async fn delete_client(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    client_id: &str,
) -> Result<(), DomainError> {
    let doc = get_client(dynamo, table_name, client_id).await?;

    for motion in &doc.motions {
        storage::delete_by_url(s3, bucket, &motion.video).await?;
    }
    for still in &doc.stills {
        storage::delete_by_url(s3, bucket, &still.image).await?;
    }

    dynamo
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CLIENT".to_string()))
        .key("SK", AttributeValue::S(format!("CLIENT#{}", client_id)))
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("DynamoDB delete_item error: {}", e)))?;

    Ok(())
}

/// Replace the whole motions sequence. Last writer wins at the document
/// level; there is no per-element merge.
pub async fn set_motions(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    motions: &[Motion],
) -> Result<(), DomainError> {
    let list = AttributeValue::L(motions.iter().map(motion_to_attr).collect());

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CLIENT".to_string()))
        .key("SK", AttributeValue::S(format!("CLIENT#{}", client_id)))
        .update_expression("SET motions = :motions")
        .expression_attribute_values(":motions", list)
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("DynamoDB update_item error: {}", e)))?;

    Ok(())
}

/// Replace the whole stills sequence. Indexes are renumbered to match the
/// submitted order before the write.
pub async fn set_stills(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    stills: Vec<Still>,
) -> Result<Vec<Still>, DomainError> {
    let stills: Vec<Still> = stills
        .into_iter()
        .enumerate()
        .map(|(index, still)| Still {
            image: still.image,
            index,
        })
        .collect();

    let list = AttributeValue::L(stills.iter().map(still_to_attr).collect());

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("CLIENT".to_string()))
        .key("SK", AttributeValue::S(format!("CLIENT#{}", client_id)))
        .update_expression("SET stills = :stills")
        .expression_attribute_values(":stills", list)
        .send()
        .await
        .map_err(|e| DomainError::RemoteCall(format!("DynamoDB update_item error: {}", e)))?;

    Ok(stills)
}

/// Persist a reorder commit for motions. The submitted ids must be a pure
/// permutation of the stored sequence; anything else is rejected before any
/// write so a stale editor cannot drop or duplicate records.
pub async fn reorder_motions(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    ordered_ids: &[String],
) -> Result<Vec<Motion>, DomainError> {
    let doc = get_client(client, table_name, client_id).await?;
    let reordered = permuted_by_ids(doc.motions, ordered_ids)?;
    set_motions(client, table_name, client_id, &reordered).await?;
    Ok(reordered)
}

/// Persist a reorder commit for stills, expressed as previous positions in
/// their new display order.
pub async fn reorder_stills(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    order: &[usize],
) -> Result<Vec<Still>, DomainError> {
    let doc = get_client(client, table_name, client_id).await?;
    let reordered = permuted_by_positions(doc.stills, order)?;
    set_stills(client, table_name, client_id, reordered).await
}

/// Rebuild a motion sequence in the order given by `ordered_ids`, verifying
/// the ids are a permutation of the stored ones.
pub(crate) fn permuted_by_ids(
    motions: Vec<Motion>,
    ordered_ids: &[String],
) -> Result<Vec<Motion>, DomainError> {
    if ordered_ids.len() != motions.len() {
        return Err(DomainError::Validation(format!(
            "reorder must list all {} motions, got {}",
            motions.len(),
            ordered_ids.len()
        )));
    }

    let mut by_id: HashMap<&str, &Motion> =
        motions.iter().map(|m| (m.motion_id.as_str(), m)).collect();
    if by_id.len() != motions.len() {
        return Err(DomainError::Validation(
            "stored motions contain duplicate ids".to_string(),
        ));
    }

    let mut reordered = Vec::with_capacity(motions.len());
    for id in ordered_ids {
        let motion = by_id.remove(id.as_str()).ok_or_else(|| {
            DomainError::Validation(format!("reorder is not a permutation: unknown or duplicate id {}", id))
        })?;
        reordered.push(motion.clone());
    }
    Ok(reordered)
}

/// Rebuild a still sequence from previous positions in their new order,
/// verifying `order` is a permutation of 0..len.
pub(crate) fn permuted_by_positions(
    stills: Vec<Still>,
    order: &[usize],
) -> Result<Vec<Still>, DomainError> {
    if order.len() != stills.len() {
        return Err(DomainError::Validation(format!(
            "reorder must list all {} stills, got {}",
            stills.len(),
            order.len()
        )));
    }

    let mut seen = vec![false; stills.len()];
    for &position in order {
        if position >= stills.len() || seen[position] {
            return Err(DomainError::Validation(format!(
                "reorder is not a permutation: bad position {}",
                position
            )));
        }
        seen[position] = true;
    }

    Ok(order.iter().map(|&i| stills[i].clone()).collect())
}

// ---- DynamoDB marshalling ----

pub(crate) fn motion_to_attr(motion: &Motion) -> AttributeValue {
    let mut m = HashMap::new();
    m.insert(
        "motion_id".to_string(),
        AttributeValue::S(motion.motion_id.clone()),
    );
    m.insert(
        "client_id".to_string(),
        AttributeValue::S(motion.client_id.clone()),
    );
    m.insert("video".to_string(), AttributeValue::S(motion.video.clone()));
    m.insert("logo".to_string(), AttributeValue::S(motion.logo.clone()));
    if let Some(title) = &motion.title {
        m.insert("title".to_string(), AttributeValue::S(title.clone()));
    }
    if let Some(description) = &motion.description {
        m.insert(
            "description".to_string(),
            AttributeValue::S(description.clone()),
        );
    }
    m.insert(
        "created_at".to_string(),
        AttributeValue::S(motion.created_at.clone()),
    );
    AttributeValue::M(m)
}

pub(crate) fn motion_from_attr(value: &AttributeValue) -> Option<Motion> {
    let m = value.as_m().ok()?;
    Some(Motion {
        motion_id: m.get("motion_id")?.as_s().ok()?.to_string(),
        client_id: m
            .get("client_id")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        video: m.get("video")?.as_s().ok()?.to_string(),
        logo: m
            .get("logo")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        title: m
            .get("title")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()),
        description: m
            .get("description")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()),
        created_at: m
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    })
}

pub(crate) fn still_to_attr(still: &Still) -> AttributeValue {
    let mut m = HashMap::new();
    m.insert("image".to_string(), AttributeValue::S(still.image.clone()));
    m.insert(
        "index".to_string(),
        AttributeValue::N(still.index.to_string()),
    );
    AttributeValue::M(m)
}

pub(crate) fn still_from_attr(value: &AttributeValue) -> Option<Still> {
    let m = value.as_m().ok()?;
    Some(Still {
        image: m.get("image")?.as_s().ok()?.to_string(),
        index: m
            .get("index")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok())
            .unwrap_or_default(),
    })
}

pub(crate) fn client_from_item(item: &HashMap<String, AttributeValue>) -> Option<Client> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let client_id = sk.strip_prefix("CLIENT#")?;

    let motions = item
        .get("motions")
        .and_then(|v| v.as_l().ok())
        .map(|l| l.iter().filter_map(motion_from_attr).collect())
        .unwrap_or_default();
    let stills = item
        .get("stills")
        .and_then(|v| v.as_l().ok())
        .map(|l| l.iter().filter_map(still_from_attr).collect())
        .unwrap_or_default();

    Some(Client {
        client_id: client_id.to_string(),
        name: item
            .get("name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        image: item
            .get("image")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        motions,
        stills,
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(id: &str) -> Motion {
        Motion {
            motion_id: id.to_string(),
            client_id: "c1".to_string(),
            video: format!("https://cdn.example.com/{}.mp4", id),
            logo: "https://cdn.example.com/logo.png".to_string(),
            title: Some(format!("Motion {}", id)),
            description: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn still(url: &str, index: usize) -> Still {
        Still {
            image: url.to_string(),
            index,
        }
    }

    #[test]
    fn motion_marshalling_round_trips() {
        let m = motion("m1");
        assert_eq!(motion_from_attr(&motion_to_attr(&m)), Some(m));

        let bare = Motion {
            title: None,
            description: None,
            ..motion("m2")
        };
        assert_eq!(motion_from_attr(&motion_to_attr(&bare)), Some(bare));
    }

    #[test]
    fn still_marshalling_round_trips() {
        let s = still("https://cdn.example.com/a.png", 3);
        assert_eq!(still_from_attr(&still_to_attr(&s)), Some(s));
    }

    #[test]
    fn reorder_by_ids_is_a_pure_permutation() {
        let motions = vec![motion("a"), motion("b"), motion("c")];
        let order = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        let reordered = permuted_by_ids(motions, &order).unwrap();
        let ids: Vec<&str> = reordered.iter().map(|m| m.motion_id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn reorder_rejects_unknown_duplicate_or_short_ids() {
        let motions = || vec![motion("a"), motion("b")];

        let unknown = vec!["a".to_string(), "x".to_string()];
        assert!(matches!(
            permuted_by_ids(motions(), &unknown),
            Err(DomainError::Validation(_))
        ));

        let duplicate = vec!["a".to_string(), "a".to_string()];
        assert!(matches!(
            permuted_by_ids(motions(), &duplicate),
            Err(DomainError::Validation(_))
        ));

        let short = vec!["a".to_string()];
        assert!(matches!(
            permuted_by_ids(motions(), &short),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn reorder_stills_by_positions() {
        let stills = vec![still("a", 0), still("b", 1), still("c", 2)];
        let reordered = permuted_by_positions(stills, &[2, 0, 1]).unwrap();
        let urls: Vec<&str> = reordered.iter().map(|s| s.image.as_str()).collect();
        assert_eq!(urls, ["c", "a", "b"]);
    }

    #[test]
    fn reorder_stills_rejects_bad_positions() {
        let stills = || vec![still("a", 0), still("b", 1)];
        assert!(matches!(
            permuted_by_positions(stills(), &[0, 2]),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            permuted_by_positions(stills(), &[1, 1]),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            permuted_by_positions(stills(), &[0]),
            Err(DomainError::Validation(_))
        ));
    }
}
