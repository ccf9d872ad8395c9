//! DynamoDbUserRepository の統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p bloglist-infra --test user_repository_test -- --ignored
//! ```

mod common;

use bloglist_domain::{blog::BlogId, user::Username};
use bloglist_infra::repository::{DynamoDbUserRepository, UserRepository};
use common::{setup, teardown, test_user};
use pretty_assertions::assert_eq;

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_登録したユーザーをidとユーザー名で取得できる() {
    let (client, tables) = setup().await;
    let sut = DynamoDbUserRepository::new(client.clone(), &tables);
    let user = test_user("mluukkai");

    sut.insert(&user).await.unwrap();

    assert_eq!(sut.find_by_id(user.id()).await.unwrap(), Some(user.clone()));
    assert_eq!(
        sut.find_by_username(&Username::new("mluukkai").unwrap())
            .await
            .unwrap(),
        Some(user)
    );

    teardown(&client, &tables).await;
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_重複したユーザー名はconflictになる() {
    let (client, tables) = setup().await;
    let sut = DynamoDbUserRepository::new(client.clone(), &tables);
    sut.insert(&test_user("root")).await.unwrap();

    let result = sut.insert(&test_user("root")).await;

    let err = result.unwrap_err();
    assert_eq!(err.as_conflict(), Some(("User", "root")));
    assert_eq!(sut.find_all().await.unwrap().len(), 1);

    teardown(&client, &tables).await;
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_存在しないユーザーはnoneを返す() {
    let (client, tables) = setup().await;
    let sut = DynamoDbUserRepository::new(client.clone(), &tables);

    let by_name = sut
        .find_by_username(&Username::new("nobody").unwrap())
        .await
        .unwrap();

    assert_eq!(by_name, None);

    teardown(&client, &tables).await;
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_ブログの追加と削除がユーザーに反映される() {
    let (client, tables) = setup().await;
    let sut = DynamoDbUserRepository::new(client.clone(), &tables);
    let user = test_user("hellas");
    sut.insert(&user).await.unwrap();
    let first = BlogId::new();
    let second = BlogId::new();

    sut.add_blog(user.id(), &first).await.unwrap();
    sut.add_blog(user.id(), &second).await.unwrap();
    sut.remove_blog(user.id(), &first).await.unwrap();

    let stored = sut.find_by_id(user.id()).await.unwrap().unwrap();
    assert_eq!(stored.blogs(), &[second]);

    teardown(&client, &tables).await;
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_find_allはid昇順で返しdelete_allで空になる() {
    let (client, tables) = setup().await;
    let sut = DynamoDbUserRepository::new(client.clone(), &tables);
    let first = test_user("first");
    let second = test_user("second");
    sut.insert(&second).await.unwrap();
    sut.insert(&first).await.unwrap();

    let all = sut.find_all().await.unwrap();
    assert_eq!(
        all.iter().map(|u| u.username().as_str()).collect::<Vec<_>>(),
        vec!["first", "second"]
    );

    sut.delete_all().await.unwrap();
    assert!(sut.find_all().await.unwrap().is_empty());
    // ユーザー名も解放される
    sut.insert(&test_user("first")).await.unwrap();

    teardown(&client, &tables).await;
}
