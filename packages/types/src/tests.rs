//! Tests for labels, ranking and result packaging

#[cfg(test)]
mod tests {
    use crate::rank::scale_percent;
    use crate::{
        ConditionLabel, EyescanError, LabelScores, Modality, RecordLabel, Report, rank,
    };
    use serde_json::json;

    // ============================================================================
    // ConditionLabel tests
    // ============================================================================

    #[test]
    fn test_label_order_matches_index() {
        for (i, label) in ConditionLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(ConditionLabel::from_index(i), Some(*label));
        }
        assert_eq!(ConditionLabel::from_index(8), None);
    }

    #[test]
    fn test_label_round_trips_through_str() {
        for label in ConditionLabel::ALL {
            assert_eq!(label.as_str().parse::<ConditionLabel>().unwrap(), label);
        }
        assert!("glaucoma".parse::<ConditionLabel>().is_err());
    }

    #[test]
    fn test_label_serializes_snake_case() {
        let value = serde_json::to_value(ConditionLabel::AllergicReaction).unwrap();
        assert_eq!(value, json!("allergic_reaction"));
    }

    // ============================================================================
    // rank tests
    // ============================================================================

    #[test]
    fn test_rank_orders_descending() {
        let ranked = rank(LabelScores::new(vec![
            (ConditionLabel::Normal, 0.1),
            (ConditionLabel::Stye, 0.6),
            (ConditionLabel::DryEye, 0.3),
        ]));
        let labels: Vec<_> = ranked.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                ConditionLabel::Stye,
                ConditionLabel::DryEye,
                ConditionLabel::Normal
            ]
        );
    }

    #[test]
    fn test_rank_ties_keep_class_order() {
        let ranked = rank(LabelScores::new(vec![
            (ConditionLabel::Ptosis, 0.25),
            (ConditionLabel::Conjunctivitis, 0.25),
            (ConditionLabel::Stye, 0.5),
            (ConditionLabel::Chalazion, 0.25),
        ]));
        let labels: Vec<_> = ranked.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                ConditionLabel::Stye,
                ConditionLabel::Ptosis,
                ConditionLabel::Conjunctivitis,
                ConditionLabel::Chalazion
            ]
        );
    }

    #[test]
    fn test_scale_percent_rounds_two_decimals() {
        assert_eq!(scale_percent(0.123456), 12.35);
        assert_eq!(scale_percent(1.0), 100.0);
        assert_eq!(scale_percent(0.0), 0.0);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let scores = LabelScores::new(vec![(ConditionLabel::Normal, f64::NAN)]);
        assert!(matches!(
            scores.validate(),
            Err(EyescanError::Inference(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(LabelScores::new(vec![]).validate().is_err());
    }

    // ============================================================================
    // Report packaging tests
    // ============================================================================

    #[test]
    fn test_success_report_wire_format_text() {
        let ranked = rank(LabelScores::new(vec![
            (ConditionLabel::Stye, 0.75),
            (ConditionLabel::DryEye, 0.25),
        ]));
        let report = Report::success(Modality::Text, ranked, true);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!([
                {"disease": "stye", "confidence": 0.75, "relevanceScore": 75.0},
                {"disease": "dry_eye", "confidence": 0.25, "relevanceScore": 25.0}
            ])
        );
    }

    #[test]
    fn test_unreliable_report_is_flagged() {
        let ranked = rank(LabelScores::new(vec![(ConditionLabel::Normal, 1.0)]));
        let report = Report::success(Modality::Image, ranked, false);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value[0]["probability"], json!(100.0));
        assert_eq!(value[0]["unreliable"], json!(true));
    }

    #[test]
    fn test_failure_report_is_single_error_record() {
        let error = EyescanError::Input("image URL required".to_string());
        let report = Report::from_outcome(Modality::Image, Err(error));
        assert!(report.is_error());
        assert_eq!(report.records().len(), 1);
        assert_eq!(report.records()[0].label, RecordLabel::Error);

        let value = serde_json::to_value(&report).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["disease"], json!("error"));
        assert_eq!(records[0]["confidence"], json!(0.0));
        assert_eq!(records[0]["probability"], json!(0.0));
        let message = records[0]["error"].as_str().unwrap();
        assert!(message.contains("image URL required"));
    }

    #[test]
    fn test_report_confidence_lookup() {
        let ranked = rank(LabelScores::new(vec![(ConditionLabel::Ptosis, 0.4)]));
        let report = Report::success(Modality::Text, ranked, true);
        assert_eq!(report.confidence_of(ConditionLabel::Ptosis), Some(0.4));
        assert_eq!(report.confidence_of(ConditionLabel::Normal), None);
        assert_eq!(report.error_message(), None);
        assert!(!serde_json::to_value(&report).unwrap()[0]
            .as_object()
            .unwrap()
            .contains_key("unreliable"));
    }

    #[test]
    fn test_persistence_errors_trigger_bootstrap() {
        assert!(EyescanError::ArtifactNotFound("models/x".into()).is_persistence());
        assert!(EyescanError::persistence("models/x", "bad header").is_persistence());
        assert!(!EyescanError::Decode("bad png".into()).is_persistence());
    }
}
