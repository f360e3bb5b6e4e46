mod common;

use anyhow::Result;
use chrono::Utc;
use common::{counting_service, memory_service, sample_entry, test_service};
use finbook::application::{AppError, BusinessRuleError};
use finbook::domain::{Entry, EntryStatus, EntryType};

#[tokio::test]
async fn test_save_entry() -> Result<()> {
    let service = memory_service();

    let saved = service
        .entries()
        .save(&Entry::new("Salario", 1, 2020, 1, EntryType::Income, 1))
        .await?;

    assert!(saved.is_persisted());
    assert_eq!(saved.status, Some(EntryStatus::Pending));
    assert_eq!(saved.registered_at, Some(Utc::now().date_naive()));
    assert_eq!(saved.description.as_deref(), Some("Salario"));

    Ok(())
}

#[tokio::test]
async fn test_save_keeps_given_status() -> Result<()> {
    let service = memory_service();

    let saved = service
        .entries()
        .save(&sample_entry(1).with_status(EntryStatus::Settled))
        .await?;

    assert_eq!(saved.status, Some(EntryStatus::Settled));

    Ok(())
}

#[tokio::test]
async fn test_save_invalid_entry_is_not_persisted() -> Result<()> {
    let (service, store) = counting_service();

    let result = service
        .entries()
        .save(&sample_entry(1).with_month(13))
        .await;

    assert!(matches!(
        result,
        Err(AppError::BusinessRule(BusinessRuleError::InvalidMonth))
    ));
    assert_eq!(store.entry_saves(), 0);

    Ok(())
}

#[tokio::test]
async fn test_save_always_inserts() -> Result<()> {
    let service = memory_service();
    let first = service.entries().save(&sample_entry(1)).await?;

    let second = service
        .entries()
        .save(&first.clone().with_description("Outro salario"))
        .await?;

    assert_ne!(second.id, first.id);
    assert_eq!(
        service.entries().find_by_id(first.id.unwrap()).await?,
        Some(first)
    );
    assert_eq!(service.entries().find(&Entry::default()).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_update_entry() -> Result<()> {
    let (service, store) = counting_service();
    let saved = service.entries().save(&sample_entry(1)).await?;

    let changed = saved.clone().with_description("Salario + bonus").with_value(250);
    let updated = service.entries().update(&changed).await?;

    assert_eq!(updated, changed);
    assert_eq!(store.entry_saves(), 2);
    assert_eq!(
        service.entries().find_by_id(saved.id.unwrap()).await?,
        Some(changed)
    );

    Ok(())
}

#[tokio::test]
async fn test_update_unsaved_entry_fails() -> Result<()> {
    let (service, store) = counting_service();

    for entry in [sample_entry(1), sample_entry(1).with_id(0)] {
        let result = service.entries().update(&entry).await;

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            AppError::BusinessRule(BusinessRuleError::UnsavedEntry)
        ));
    }
    assert_eq!(store.entry_saves(), 0);

    Ok(())
}

#[tokio::test]
async fn test_update_without_owner_fails() -> Result<()> {
    let (service, store) = counting_service();
    let saved = service.entries().save(&sample_entry(1)).await?;

    let mut orphan = saved.clone();
    orphan.owner = None;
    let result = service.entries().update(&orphan).await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        AppError::BusinessRule(BusinessRuleError::InvalidUser)
    ));
    assert_eq!(err.to_string(), "invalid user");
    assert_eq!(store.entry_saves(), 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_entry() -> Result<()> {
    let (service, store) = counting_service();
    let saved = service.entries().save(&sample_entry(1)).await?;

    service.entries().delete(&saved).await?;

    assert_eq!(store.entry_deletes(), 1);
    assert_eq!(service.entries().find_by_id(saved.id.unwrap()).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_delete_unsaved_entry_fails() -> Result<()> {
    let (service, store) = counting_service();

    for entry in [sample_entry(1), sample_entry(1).with_id(0)] {
        let err = service.entries().delete(&entry).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidEntryId(0)));
        assert_eq!(err.to_string(), "invalid entry id: 0");
    }
    assert_eq!(store.entry_deletes(), 0);

    Ok(())
}

#[tokio::test]
async fn test_find_by_example() -> Result<()> {
    let service = memory_service();
    let salary = service.entries().save(&sample_entry(1)).await?;
    let rent = service
        .entries()
        .save(&Entry::new("Aluguel", 1, 2020, 900, EntryType::Expense, 1))
        .await?;
    service
        .entries()
        .save(&Entry::new("Aluguel", 2, 2020, 900, EntryType::Expense, 2))
        .await?;

    let found = service.entries().find(&salary).await?;
    assert_eq!(found, vec![salary.clone()]);

    let example = Entry::default().with_owner(1);
    let found = service.entries().find(&example).await?;
    assert_eq!(found, vec![salary, rent.clone()]);

    let example = Entry::default().with_description("Aluguel").with_month(1);
    let found = service.entries().find(&example).await?;
    assert_eq!(found, vec![rent]);

    let found = service.entries().find(&Entry::default()).await?;
    assert_eq!(found.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_update_status() -> Result<()> {
    let (service, store) = counting_service();
    let mut entry = service.entries().save(&sample_entry(1)).await?;

    let updated = service
        .entries()
        .update_status(&mut entry, EntryStatus::Settled)
        .await?;

    assert_eq!(entry.status, Some(EntryStatus::Settled));
    assert_eq!(updated.status, Some(EntryStatus::Settled));
    assert_eq!(store.entry_saves(), 2);

    Ok(())
}

#[tokio::test]
async fn test_status_transitions_are_permissive() -> Result<()> {
    let service = memory_service();
    let mut entry = service.entries().save(&sample_entry(1)).await?;

    for status in [
        EntryStatus::Cancelled,
        EntryStatus::Settled,
        EntryStatus::Pending,
        EntryStatus::Settled,
    ] {
        service.entries().update_status(&mut entry, status).await?;
        let stored = service.entries().find_by_id(entry.id.unwrap()).await?;
        assert_eq!(stored.and_then(|e| e.status), Some(status));
    }

    Ok(())
}

#[tokio::test]
async fn test_update_status_on_unsaved_entry_fails() -> Result<()> {
    let (service, store) = counting_service();
    let mut entry = sample_entry(1);

    let result = service
        .entries()
        .update_status(&mut entry, EntryStatus::Settled)
        .await;

    assert!(matches!(
        result,
        Err(AppError::BusinessRule(BusinessRuleError::UnsavedEntry))
    ));
    assert_eq!(store.entry_saves(), 0);

    Ok(())
}

#[tokio::test]
async fn test_find_by_id_missing() -> Result<()> {
    let service = memory_service();

    assert_eq!(service.entries().find_by_id(1).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_save_round_trip_with_sqlite() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = service
        .users()
        .register("usuario", "usuario@email.com", "senha")
        .await?;

    let saved = service
        .entries()
        .save(&Entry::new(
            "Salario",
            1,
            2020,
            1,
            EntryType::Income,
            user.id.unwrap(),
        ))
        .await?;
    assert!(saved.is_persisted());
    assert_eq!(saved.status, Some(EntryStatus::Pending));

    let found = service.entries().find_by_id(saved.id.unwrap()).await?;
    assert_eq!(found, Some(saved));

    Ok(())
}

#[tokio::test]
async fn test_full_lifecycle_with_sqlite() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = service
        .users()
        .register("usuario", "usuario@email.com", "senha")
        .await?
        .id
        .unwrap();

    let mut entry = service
        .entries()
        .save(&Entry::new("Mercado", 3, 2024, 12_50, EntryType::Expense, owner))
        .await?;

    service
        .entries()
        .update(&entry.clone().with_value(15_00))
        .await?;
    entry = service.entries().find_by_id(entry.id.unwrap()).await?.unwrap();
    assert_eq!(entry.value, Some(15_00));

    service
        .entries()
        .update_status(&mut entry, EntryStatus::Settled)
        .await?;
    assert_eq!(service.entries().balance(owner).await?, -15_00);

    let found = service
        .entries()
        .find(&Entry::default().with_owner(owner).with_status(EntryStatus::Settled))
        .await?;
    assert_eq!(found, vec![entry.clone()]);

    service.entries().delete(&entry).await?;
    assert_eq!(service.entries().find_by_id(entry.id.unwrap()).await?, None);
    assert_eq!(service.entries().balance(owner).await?, 0);

    Ok(())
}
