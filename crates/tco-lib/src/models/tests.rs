//! Validation and serialization tests for the data model

#[cfg(test)]
mod validation_tests {
    use crate::error::ValidationError;
    use crate::models::*;

    fn minimal_deployment() -> TelcoDeployment {
        TelcoDeployment::new(
            UserPlaneLocation::Region,
            ComputeResources::new(1, 1).unwrap(),
            StorageResources::new(0, 0, 0),
            NetworkResources::with_default_split(0.0, 0.0).unwrap(),
            1,
            1,
            DEFAULT_REGION,
        )
        .unwrap()
    }

    #[test]
    fn test_minimum_boundary_values_accepted() {
        let deployment = minimal_deployment();
        assert_eq!(deployment.compute().vcpu(), 1);
        assert_eq!(deployment.compute().memory(), 1);
        assert_eq!(deployment.eks_clusters(), 1);
        assert_eq!(deployment.sites(), 1);
        assert_eq!(deployment.storage().s3_storage(), 0);
        assert_eq!(deployment.region(), "us-east-1");
    }

    #[test]
    fn test_zero_where_minimum_is_one_rejected() {
        let err = ComputeResources::new(0, 4).unwrap_err();
        assert_eq!(err.field(), "vcpu");

        let err = ComputeResources::new(4, 0).unwrap_err();
        assert_eq!(err.field(), "memory");

        let base = minimal_deployment();
        let err = TelcoDeployment::new(
            base.user_plane(),
            base.compute().clone(),
            *base.storage(),
            *base.network(),
            0,
            1,
            DEFAULT_REGION,
        )
        .unwrap_err();
        assert_eq!(err.field(), "eks_clusters");

        let err = TelcoDeployment::new(
            base.user_plane(),
            base.compute().clone(),
            *base.storage(),
            *base.network(),
            1,
            0,
            DEFAULT_REGION,
        )
        .unwrap_err();
        assert_eq!(err.field(), "sites");
    }

    #[test]
    fn test_negative_network_values_rejected() {
        let err = NetworkResources::with_default_split(-0.1, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::BelowMinimum {
                field: "peak_bandwidth",
                ..
            }
        ));

        let err = NetworkResources::with_default_split(1.0, -3.0).unwrap_err();
        assert_eq!(err.field(), "monthly_tonnage");
    }

    #[test]
    fn test_infinite_bandwidth_rejected() {
        let err = NetworkResources::with_default_split(f64::INFINITY, 1.0).unwrap_err();
        assert_eq!(err, ValidationError::NotFinite { field: "peak_bandwidth" });
    }

    #[test]
    fn test_traffic_split_sum_tolerance() {
        assert!(TrafficSplit::new(60.0, 40.0).is_ok());
        assert!(TrafficSplit::new(60.005, 39.995).is_ok());

        let err = TrafficSplit::new(60.0, 41.0).unwrap_err();
        assert!(matches!(err, ValidationError::SplitSum { .. }));
    }

    #[test]
    fn test_traffic_split_upper_bound_checked_before_sum() {
        let err = TrafficSplit::new(150.0, -50.0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::AboveMaximum {
                field: "direct_connect_percent",
                ..
            }
        ));
    }

    #[test]
    fn test_traffic_split_default() {
        let split = TrafficSplit::default();
        assert_eq!(split.direct_connect_percent(), 80.0);
        assert_eq!(split.internet_gateway_percent(), 20.0);
    }

    #[test]
    fn test_user_plane_literals() {
        assert_eq!("region".parse::<UserPlaneLocation>().unwrap(), UserPlaneLocation::Region);
        assert_eq!(
            "outposts".parse::<UserPlaneLocation>().unwrap(),
            UserPlaneLocation::Outposts
        );

        for bad in ["Region", "edge", "", "outpost"] {
            let err = bad.parse::<UserPlaneLocation>().unwrap_err();
            assert_eq!(err.field(), "user_plane");
        }
    }

    #[test]
    fn test_blank_region_rejected() {
        let base = minimal_deployment();
        let err = TelcoDeployment::new(
            base.user_plane(),
            base.compute().clone(),
            *base.storage(),
            *base.network(),
            1,
            1,
            "   ",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Blank { field: "region" });
    }

    #[test]
    fn test_negative_total_breakdown_rejected() {
        let err = CostBreakdown::new(1.0, 1.0, 1.0, 1.0, 1.0, -0.01).unwrap_err();
        assert_eq!(err.field(), "total_monthly_cost");
    }

    #[test]
    fn test_breakdown_total_not_forced_to_sum() {
        let breakdown = CostBreakdown::new(1.0, 2.0, 3.0, 4.0, 5.0, 100.0).unwrap();
        assert_eq!(breakdown.total_monthly_cost(), 100.0);
        assert_eq!(breakdown.component_sum(), 15.0);
    }

    #[test]
    fn test_from_components_and_scaling() {
        let monthly = CostBreakdown::from_components(10.0, 20.0, 30.0, 40.0, 50.0).unwrap();
        assert_eq!(monthly.total_monthly_cost(), 150.0);

        let annual = monthly.scaled(MONTHS_PER_YEAR).unwrap();
        assert_eq!(annual.compute_cost(), 120.0);
        assert_eq!(annual.total_monthly_cost(), 1800.0);
    }

    #[test]
    fn test_analysis_builder_derives_totals() {
        let deployment = TelcoDeployment::new(
            UserPlaneLocation::Region,
            ComputeResources::new(8, 32).unwrap(),
            StorageResources::new(100, 0, 0),
            NetworkResources::with_default_split(1.0, 1.0).unwrap(),
            1,
            4,
            DEFAULT_REGION,
        )
        .unwrap();
        let monthly = CostBreakdown::from_components(100.0, 50.0, 25.0, 15.0, 10.0).unwrap();
        let annual = monthly.scaled(MONTHS_PER_YEAR).unwrap();

        let analysis = CostAnalysis::builder(deployment, monthly, annual)
            .assumption("On-demand pricing")
            .build()
            .unwrap();

        assert_eq!(analysis.three_year_tco(), 7200.0);
        assert_eq!(analysis.cost_per_site(), 50.0);
        assert_eq!(analysis.assumptions(), ["On-demand pricing".to_string()]);
        assert!(analysis.recommendations().is_empty());
        assert!(analysis.optimizations().is_empty());
    }

    #[test]
    fn test_analysis_builder_rejects_negative_override() {
        let deployment = minimal_deployment();
        let monthly = CostBreakdown::from_components(1.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let annual = monthly.scaled(MONTHS_PER_YEAR).unwrap();

        let err = CostAnalysis::builder(deployment.clone(), monthly, annual)
            .three_year_tco(-1.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "three_year_tco");

        let err = CostAnalysis::builder(deployment, monthly, annual)
            .cost_per_site(-5.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "cost_per_site");
    }

    #[test]
    fn test_recommendation_levels_parse_case_insensitively() {
        assert_eq!("low".parse::<ImplementationEffort>().unwrap(), ImplementationEffort::Low);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert!(Priority::High < Priority::Low);
    }

    #[test]
    fn test_recommendation_negative_savings_rejected() {
        let err = OptimizationRecommendation::new(
            "Compute",
            "Buy a savings plan",
            -10.0,
            ImplementationEffort::Low,
            Priority::High,
        )
        .unwrap_err();
        assert_eq!(err.field(), "potential_savings");
    }
}

#[cfg(test)]
mod serde_tests {
    use crate::models::*;
    use serde_json::json;

    fn sample_deployment() -> TelcoDeployment {
        TelcoDeployment::new(
            UserPlaneLocation::Outposts,
            ComputeResources::new(96, 384)
                .unwrap()
                .with_instance_types(["c6gn.4xlarge", "m5.2xlarge", "c6gn.4xlarge"]),
            StorageResources::new(2000, 500, 10_000),
            NetworkResources::new(25.0, 300.0, TrafficSplit::new(70.0, 30.0).unwrap()).unwrap(),
            3,
            3,
            "eu-west-1",
        )
        .unwrap()
    }

    #[test]
    fn test_deployment_round_trip() {
        let deployment = sample_deployment();
        let json = serde_json::to_string(&deployment).unwrap();
        let parsed: TelcoDeployment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, deployment);
    }

    #[test]
    fn test_round_trip_preserves_awkward_floats() {
        let deployment = TelcoDeployment::new(
            UserPlaneLocation::Region,
            ComputeResources::new(96, 384).unwrap(),
            StorageResources::new(0, 0, 0),
            NetworkResources::new(
                0.1 + 0.2,
                493053.83999999997,
                TrafficSplit::new(60.005, 39.995).unwrap(),
            )
            .unwrap(),
            2,
            2,
            DEFAULT_REGION,
        )
        .unwrap();

        let json = serde_json::to_string(&deployment).unwrap();
        let parsed: TelcoDeployment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, deployment);
        assert_eq!(parsed.network().monthly_tonnage().to_bits(), 493053.83999999997f64.to_bits());

        let analysis = crate::calculator::NetworkCalculator::default()
            .calculate(&deployment)
            .unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        let parsed: CostAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, analysis);
    }

    #[test]
    fn test_integral_floats_accepted_for_counts() {
        let value = json!({
            "user_plane": "region",
            "compute": {"vcpu": 4.0, "memory": 16},
            "storage": {"ebs_storage": 100.0, "efs_storage": 0},
            "network": {"peak_bandwidth": 1.0, "monthly_tonnage": 2.0},
            "eks_clusters": 1.0,
            "sites": 2
        });

        let deployment: TelcoDeployment = serde_json::from_value(value).unwrap();
        assert_eq!(deployment.compute().vcpu(), 4);
        assert_eq!(deployment.storage().ebs_storage(), 100);
        assert_eq!(deployment.eks_clusters(), 1);
    }

    #[test]
    fn test_fractional_counts_rejected() {
        let value = json!({"vcpu": 4.5, "memory": 16});
        let err = serde_json::from_value::<ComputeResources>(value).unwrap_err();
        assert!(err.to_string().contains("whole number"), "{}", err);

        let err = serde_json::from_str::<ComputeResources>(r#"{"vcpu": 0.0, "memory": 16}"#)
            .unwrap_err();
        assert!(err.to_string().contains("vcpu must be >= 1"), "{}", err);
    }

    #[test]
    fn test_deployment_field_names() {
        let value = serde_json::to_value(sample_deployment()).unwrap();
        assert_eq!(value["user_plane"], "outposts");
        assert_eq!(value["compute"]["vcpu"], 96);
        assert_eq!(value["compute"]["instance_types"][0], "c6gn.4xlarge");
        assert_eq!(value["storage"]["s3_storage"], 10_000);
        assert_eq!(value["network"]["traffic_split"]["direct_connect_percent"], 70.0);
        assert_eq!(value["eks_clusters"], 3);
        assert_eq!(value["region"], "eu-west-1");
    }

    #[test]
    fn test_deployment_defaults_applied() {
        let value = json!({
            "user_plane": "region",
            "compute": {"vcpu": 4, "memory": 16},
            "storage": {"ebs_storage": 100, "efs_storage": 0},
            "network": {"peak_bandwidth": 1.5, "monthly_tonnage": 2.0},
            "eks_clusters": 1,
            "sites": 2
        });

        let deployment: TelcoDeployment = serde_json::from_value(value).unwrap();
        assert_eq!(deployment.region(), DEFAULT_REGION);
        assert_eq!(deployment.storage().s3_storage(), 0);
        assert_eq!(*deployment.network().traffic_split(), TrafficSplit::default());
        assert!(deployment.compute().instance_types().is_none());
    }

    #[test]
    fn test_deserialize_rejects_zero_vcpu() {
        let value = json!({
            "user_plane": "region",
            "compute": {"vcpu": 0, "memory": 16},
            "storage": {"ebs_storage": 0, "efs_storage": 0},
            "network": {"peak_bandwidth": 0.0, "monthly_tonnage": 0.0},
            "eks_clusters": 1,
            "sites": 1
        });

        let err = serde_json::from_value::<TelcoDeployment>(value).unwrap_err();
        assert!(err.to_string().contains("vcpu must be >= 1"));
    }

    #[test]
    fn test_deserialize_rejects_negative_storage() {
        let value = json!({"ebs_storage": -1, "efs_storage": 0});
        let err = serde_json::from_value::<StorageResources>(value).unwrap_err();
        assert!(err.to_string().contains("ebs_storage must be >= 0"));
    }

    #[test]
    fn test_deserialize_rejects_bad_split() {
        let value = json!({"direct_connect_percent": 60.0, "internet_gateway_percent": 41.0});
        let err = serde_json::from_value::<TrafficSplit>(value).unwrap_err();
        assert!(err.to_string().contains("must sum to 100%"));

        // A lone field keeps the other default, so 60 + 20 fails the sum check
        let value = json!({"direct_connect_percent": 60.0});
        assert!(serde_json::from_value::<TrafficSplit>(value).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_user_plane() {
        let err = serde_json::from_value::<UserPlaneLocation>(json!("edge")).unwrap_err();
        assert!(err.to_string().contains("user_plane must be one of"));
    }

    #[test]
    fn test_breakdown_deserialize_rejects_negative_total() {
        let value = json!({
            "compute_cost": 1.0,
            "storage_cost": 1.0,
            "network_cost": 1.0,
            "eks_cost": 1.0,
            "data_transfer_cost": 1.0,
            "total_monthly_cost": -1.0
        });
        assert!(serde_json::from_value::<CostBreakdown>(value).is_err());
    }

    #[test]
    fn test_recommendation_wire_format() {
        let rec = OptimizationRecommendation::new(
            "Storage",
            "Enable S3 Intelligent-Tiering",
            12.5,
            ImplementationEffort::Low,
            Priority::Medium,
        )
        .unwrap();

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["implementation_effort"], "Low");
        assert_eq!(value["priority"], "Medium");

        let parsed: OptimizationRecommendation = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, rec);
    }

    #[test]
    fn test_analysis_deserialize_without_optimizations() {
        let deployment = sample_deployment();
        let monthly = CostBreakdown::from_components(1.0, 2.0, 3.0, 4.0, 5.0).unwrap();
        let annual = monthly.scaled(MONTHS_PER_YEAR).unwrap();
        let analysis = CostAnalysis::builder(deployment, monthly, annual)
            .recommendation("Use Savings Plans")
            .build()
            .unwrap();

        let mut value = serde_json::to_value(&analysis).unwrap();
        value.as_object_mut().unwrap().remove("optimizations");

        let parsed: CostAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, analysis);
    }
}
